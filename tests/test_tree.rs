//! Tree and position tests against the fixture tree.

#[allow(clippy::duplicate_mod)]
#[path = "fixtures/mod.rs"]
mod fixtures;

use fixtures::*;
use std::sync::atomic::Ordering;
use treecli::{CliError, Handlers, Level, Position};

#[test]
fn test_apply_defaults() {
    CONSOLE_SPEED.store(0, Ordering::Relaxed);
    VERBOSE.store(true, Ordering::Relaxed);

    TEST_TREE.apply_defaults().unwrap();

    assert_eq!(CONSOLE_SPEED.load(Ordering::Relaxed), 115200);
    assert!(!VERBOSE.load(Ordering::Relaxed));
}

#[test]
fn test_write_tree() {
    let mut out = String::new();
    TEST_TREE.write_tree(&mut out, 0).unwrap();
    assert_eq!(
        out,
        "* /\r\n\
         \x20   * system\r\n\
         \x20       * bootloader\r\n\
         \x20   * interface\r\n\
         \x20       * ethernet<N>\r\n\
         \x20   * inpower\r\n\
         \x20       * source\r\n"
    );
}

#[test]
fn test_find_by_exact_name() {
    let system = TEST_TREE.find_subnode("system").unwrap();
    assert!(std::ptr::eq(system, &NODE_SYSTEM));
    assert!(TEST_TREE.find_subnode("sys").is_none());

    let quit = system.find_command("quit").unwrap();
    assert_eq!(quit.id, "system_quit");
    assert_eq!(system.find_value("verbose").unwrap().id, "verbose");
    assert!(system.find_value("quit").is_none());
}

#[test]
fn test_position_walk() {
    let handlers = MockHandlers::default();
    let mut pos = Position::new(4);

    pos.push(Level::Static(&NODE_INTERFACE)).unwrap();
    pos.push(Level::Dynamic {
        dnode: &DNODE_IF,
        index: 2,
    })
    .unwrap();
    assert_eq!(pos.depth(), 2);

    let node = pos.current_node(&TEST_TREE, &handlers).unwrap();
    assert_eq!(node.name(), "ethernet2");
    assert_eq!(node.values().len(), 2);

    let mut path = String::new();
    pos.write_path(&handlers, &mut path).unwrap();
    assert_eq!(path, "/interface/ethernet2");

    assert_eq!(
        pos.pop().unwrap(),
        Level::Dynamic {
            dnode: &DNODE_IF,
            index: 2
        }
    );
    assert_eq!(pos.pop().unwrap(), Level::Static(&NODE_INTERFACE));
    assert_eq!(pos.pop(), Err(CliError::AtRoot));
    assert_eq!(
        pos.current_node(&TEST_TREE, &handlers).unwrap().name(),
        "/"
    );
}

#[test]
fn test_position_depth_limit() {
    let mut pos = Position::new(2);
    pos.push(Level::Static(&NODE_SYSTEM)).unwrap();
    pos.push(Level::Static(&NODE_BOOTLOADER)).unwrap();
    assert_eq!(
        pos.push(Level::Static(&NODE_INPOWER)),
        Err(CliError::PathTooDeep)
    );
    assert_eq!(pos.depth(), 2);

    pos.reset();
    assert!(pos.is_root());
}

#[test]
fn test_unavailable_instance() {
    let handlers = MockHandlers {
        interfaces: 1,
        ..MockHandlers::default()
    };
    let mut pos = Position::new(4);
    pos.push(Level::Static(&NODE_INTERFACE)).unwrap();
    pos.push(Level::Dynamic {
        dnode: &DNODE_IF,
        index: 4,
    })
    .unwrap();

    assert_eq!(
        pos.current_node(&TEST_TREE, &handlers).unwrap_err(),
        CliError::NodeUnavailable
    );
    let mut path = String::new();
    assert_eq!(
        pos.write_path(&handlers, &mut path),
        Err(CliError::NodeUnavailable)
    );
}

#[test]
fn test_instance_children_come_from_body() {
    let handlers = MockHandlers::default();
    let view = handlers.create_node(&DNODE_IF, 0).unwrap();
    assert_eq!(view.name(), "ethernet0");
    assert_eq!(view.help(), Some("Ethernet interface"));
    assert_eq!(view.commands()[0].name, "status");
    assert!(view.subnodes().is_empty());
}
