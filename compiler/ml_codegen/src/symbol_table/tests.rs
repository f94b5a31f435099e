use super::*;
use ml_ir::StringInterner;
use pretty_assertions::assert_eq;

#[test]
fn child_levels_see_parent_declarations() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let mut table = SymbolTable::new("scope");
    table.define(x, StaticType::Number);

    table.enter(LevelKind::Branch, "s1");
    assert!(table.is_declared(x));
    assert_eq!(table.type_of(x), StaticType::Number);
    assert_eq!(table.scope_var(), "s1");

    table.exit();
    assert_eq!(table.scope_var(), "scope");
    assert_eq!(table.kind(), LevelKind::Global);
}

#[test]
fn undeclared_names_have_unknown_type() {
    let interner = StringInterner::new();
    let table = SymbolTable::new("scope");
    let y = interner.intern("y");
    assert!(!table.is_declared(y));
    assert_eq!(table.type_of(y), StaticType::Unknown);
}

#[test]
fn shadowing_is_per_level() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let mut table = SymbolTable::new("scope");
    table.define(x, StaticType::Number);

    table.enter(LevelKind::Function, "scope");
    table.define(x, StaticType::Text);
    assert_eq!(table.type_of(x), StaticType::Text);
    table.exit();

    assert_eq!(table.type_of(x), StaticType::Number);
}

#[test]
fn frame_lookup_stops_at_function_boundary() {
    let interner = StringInterner::new();
    let total = interner.intern("total");
    let mut table = SymbolTable::new("scope");
    table.define(total, StaticType::Number);

    table.enter(LevelKind::Loop, "s1");
    assert!(table.declared_in_frame(total));

    table.enter(LevelKind::Function, "scope");
    table.enter(LevelKind::Branch, "s2");
    assert!(!table.declared_in_frame(total));
    assert!(table.is_declared(total));
}

#[test]
fn rebound_names_lose_their_type() {
    let interner = StringInterner::new();
    let x = interner.intern("x");
    let mut table = SymbolTable::new("scope");
    table.set_rebound(std::iter::once(x).collect());
    table.define(x, StaticType::Number);
    table.enter(LevelKind::Loop, "s1");
    assert_eq!(table.type_of(x), StaticType::Unknown);
}

#[test]
fn loop_exits_release_inner_scopes_first() {
    let mut table = SymbolTable::new("scope");
    table.enter(LevelKind::Loop, "s1");
    table.enter(LevelKind::Branch, "s2");
    table.enter(LevelKind::Branch, "s3");
    assert_eq!(table.loop_exits(), Ok(vec!["s3", "s2", "s1"]));
}

#[test]
fn loops_do_not_cross_function_boundaries() {
    let mut table = SymbolTable::new("scope");
    assert_eq!(table.loop_exits(), Err(JumpError::NotInLoop));

    table.enter(LevelKind::Loop, "s1");
    table.enter(LevelKind::Function, "scope");
    table.enter(LevelKind::Branch, "s2");
    assert_eq!(table.loop_exits(), Err(JumpError::NotInLoop));
}

#[test]
fn return_exits_stop_at_the_function() {
    let mut table = SymbolTable::new("scope");
    assert_eq!(table.return_exits(), Err(JumpError::NotInFunction));

    table.enter(LevelKind::Loop, "s1");
    assert_eq!(table.return_exits(), Err(JumpError::NotInFunction));

    table.enter(LevelKind::Function, "scope");
    assert_eq!(table.return_exits(), Ok(vec![]));
    table.enter(LevelKind::Loop, "s2");
    table.enter(LevelKind::Branch, "s3");
    assert_eq!(table.return_exits(), Ok(vec!["s3", "s2"]));
}
