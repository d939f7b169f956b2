#![no_std]
#![no_main]

use core::fmt;
use core::sync::atomic::AtomicU32;
use panic_halt as _;
use treecli::config::MinimalConfig;
use treecli::{
    Binding, CliError, Command, DynamicNode, Handlers, Node, NodeView, Position, Value, ValueKind,
};

#[cfg(feature = "shell")]
use treecli::{CharIo, Shell};

#[cfg(not(feature = "shell"))]
use treecli::{Mode, NullOutput, Parser};

// Minimal CharIo implementation - measures only struct size
#[cfg(feature = "shell")]
pub struct MinimalIo;

#[cfg(feature = "shell")]
impl CharIo for MinimalIo {
    type Error = ();

    fn get_char(&mut self) -> Result<Option<char>, Self::Error> {
        Ok(None)
    }

    fn put_char(&mut self, _c: char) -> Result<(), Self::Error> {
        Ok(())
    }
}

// Tree items
static SPEED: AtomicU32 = AtomicU32::new(0);

static STATUS: Command = Command {
    id: "status",
    name: "status",
    help: Some("Show status"),
};

static SPEED_VALUE: Value = Value {
    id: "speed",
    name: "speed",
    help: None,
    kind: ValueKind::UInt32,
    binding: Binding::UInt(&SPEED),
    default: None,
    units: None,
};

static PORT_BODY: Node = Node {
    values: &[&SPEED_VALUE],
    ..Node::new("port")
};

static PORT: DynamicNode = DynamicNode {
    id: "port",
    name: "port",
    help: None,
};

static ROOT: Node = Node {
    dnodes: &[&PORT],
    commands: &[&STATUS],
    ..Node::new("/")
};

// Minimal handlers
struct MinHandlers;

impl Handlers for MinHandlers {
    fn execute(
        &mut self,
        command: &Command,
        _position: &Position<'_>,
        out: &mut dyn fmt::Write,
    ) -> Result<(), CliError> {
        match command.id {
            "status" => out.write_str("OK\r\n").map_err(CliError::from),
            _ => Err(CliError::command_failed("unknown command")),
        }
    }

    fn create_node(&self, dnode: &DynamicNode, index: u32) -> Option<NodeView<'static>> {
        if index < 2 {
            dnode.instance(index, &PORT_BODY)
        } else {
            None
        }
    }
}

// Entry point
#[cortex_m_rt::entry]
fn main() -> ! {
    #[cfg(feature = "shell")]
    let mut session: Shell<'_, _, _, MinimalConfig> = Shell::new(&ROOT, MinHandlers, MinimalIo);

    // Activate shell to ensure all code paths are included
    // Use black_box to prevent optimizer from removing the code
    #[cfg(feature = "shell")]
    {
        let _ = core::hint::black_box(session.activate());
        let _ = core::hint::black_box(session.process_char('?'));
        let _ = core::hint::black_box(session.process_char('\r'));
    }

    #[cfg(not(feature = "shell"))]
    let mut session: Parser<'_, _, MinimalConfig> = Parser::new(&ROOT, MinHandlers);

    #[cfg(not(feature = "shell"))]
    {
        let line = core::hint::black_box("port1 speed = 9600");
        let _ = core::hint::black_box(session.parse_line(line, Mode::EXEC, &mut NullOutput));
    }

    // Keep session alive to prevent optimization
    loop {
        core::hint::black_box(&session);
        cortex_m::asm::nop();
    }
}

// Required: exception handler
#[cortex_m_rt::exception]
unsafe fn HardFault(_ef: &cortex_m_rt::ExceptionFrame) -> ! {
    loop {
        cortex_m::asm::nop();
    }
}
