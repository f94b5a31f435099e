use super::*;
use ml_ir::{BinaryOp, ExprKind, Module, StringInterner, UnaryOp};
use pretty_assertions::assert_eq;

fn parse_ok(source: &str, interner: &StringInterner) -> Module {
    match parse(source, interner) {
        Ok(module) => module,
        Err(err) => panic!("parse failed: {err} at {:?}", err.location()),
    }
}

fn kind(module: &Module, id: ml_ir::ExprId) -> ExprKind {
    module.arena.get_expr(id).kind
}

fn only_statement(module: &Module) -> ExprKind {
    assert_eq!(module.statements().len(), 1);
    kind(module, module.statements()[0])
}

#[test]
fn precedence_of_arithmetic() {
    let interner = StringInterner::new();
    let module = parse_ok("1 + 2 * 3 ^ 2", &interner);
    let ExprKind::Binary { op, left, right } = only_statement(&module) else {
        panic!("expected binary");
    };
    assert_eq!(op, BinaryOp::Add);
    assert_eq!(kind(&module, left), ExprKind::Number(1.0));
    let ExprKind::Binary { op, right: pow, .. } = kind(&module, right) else {
        panic!("expected product");
    };
    assert_eq!(op, BinaryOp::Mul);
    assert!(matches!(
        kind(&module, pow),
        ExprKind::Binary {
            op: BinaryOp::Pow,
            ..
        }
    ));
}

#[test]
fn unary_minus_and_not() {
    let interner = StringInterner::new();
    let module = parse_ok("NOT -x == 1", &interner);
    let ExprKind::Unary { op, operand } = only_statement(&module) else {
        panic!("expected unary");
    };
    assert_eq!(op, UnaryOp::Not);
    let ExprKind::Binary { op, left, .. } = kind(&module, operand) else {
        panic!("expected comparison");
    };
    assert_eq!(op, BinaryOp::Eq);
    assert!(matches!(
        kind(&module, left),
        ExprKind::Unary {
            op: UnaryOp::Neg,
            ..
        }
    ));
}

#[test]
fn var_assignment() {
    let interner = StringInterner::new();
    let module = parse_ok("VAR total = 0", &interner);
    let ExprKind::Assign { name, value } = only_statement(&module) else {
        panic!("expected assignment");
    };
    assert_eq!(interner.lookup(name), "total");
    assert_eq!(kind(&module, value), ExprKind::Number(0.0));
}

#[test]
fn pipe_is_left_associative() {
    let interner = StringInterner::new();
    let module = parse_ok("a | f | g(2)", &interner);
    let ExprKind::Pipe { left, right } = only_statement(&module) else {
        panic!("expected pipe");
    };
    assert!(matches!(kind(&module, right), ExprKind::Call { .. }));
    let ExprKind::Pipe { left: inner, right: f } = kind(&module, left) else {
        panic!("expected inner pipe");
    };
    assert_eq!(kind(&module, inner), ExprKind::Ident(interner.intern("a")));
    assert_eq!(kind(&module, f), ExprKind::Ident(interner.intern("f")));
}

#[test]
fn block_function_with_loop() {
    let interner = StringInterner::new();
    let source = "\
fun sum(list)
    var total = 0
    for i = 0 to len(list) then
        var total = total + list[i]
    end
    return total
end
";
    let module = parse_ok(source, &interner);
    let ExprKind::Function {
        name,
        params,
        body,
        auto_return,
    } = only_statement(&module)
    else {
        panic!("expected function");
    };
    assert_eq!(name.map(|n| interner.lookup(n)), Some("sum"));
    assert!(!auto_return);
    assert_eq!(module.arena.get_params(params), &[interner.intern("list")]);

    let ExprKind::Block(statements) = kind(&module, body) else {
        panic!("expected block");
    };
    let statements = module.arena.get_expr_list(statements);
    assert_eq!(statements.len(), 3);
    let ExprKind::For { yields, step, .. } = kind(&module, statements[1]) else {
        panic!("expected for loop");
    };
    assert!(!yields);
    assert_eq!(step, None);
    assert!(matches!(kind(&module, statements[2]), ExprKind::Return(Some(_))));
}

#[test]
fn arrow_function_auto_returns() {
    let interner = StringInterner::new();
    let module = parse_ok("FUN (a, b) -> a * b", &interner);
    let ExprKind::Function {
        name, auto_return, ..
    } = only_statement(&module)
    else {
        panic!("expected function");
    };
    assert_eq!(name, None);
    assert!(auto_return);
}

#[test]
fn inline_if_with_elif_and_else() {
    let interner = StringInterner::new();
    let module = parse_ok("IF x < 0 THEN -1 ELIF x == 0 THEN 0 ELSE 1", &interner);
    let ExprKind::If {
        branches,
        else_branch,
        yields,
    } = only_statement(&module)
    else {
        panic!("expected if");
    };
    assert!(yields);
    assert_eq!(module.arena.get_branches(branches).len(), 2);
    assert!(else_branch.is_some());
}

#[test]
fn block_if_yields_nothing() {
    let interner = StringInterner::new();
    let source = "\
if x then
    print(1)
elif y then
    print(2)
else
    print(3)
end
print(4)
";
    let module = parse_ok(source, &interner);
    assert_eq!(module.statements().len(), 2);
    let ExprKind::If {
        branches, yields, ..
    } = kind(&module, module.statements()[0])
    else {
        panic!("expected if");
    };
    assert!(!yields);
    assert_eq!(branches.len(), 2);
}

#[test]
fn for_with_step_and_while_inline() {
    let interner = StringInterner::new();
    let module = parse_ok("FOR i = 10 TO 0 STEP -2 THEN i\nWHILE x THEN VAR x = x - 1", &interner);
    let statements = module.statements();
    assert!(matches!(
        kind(&module, statements[0]),
        ExprKind::For {
            step: Some(_),
            yields: true,
            ..
        }
    ));
    assert!(matches!(
        kind(&module, statements[1]),
        ExprKind::While { yields: true, .. }
    ));
}

#[test]
fn embed_defaults_to_no_model() {
    let interner = StringInterner::new();
    let module = parse_ok("EMBED \"x\"\nEMBED \"y\" WITH mini", &interner);
    let statements = module.statements();
    assert!(matches!(
        kind(&module, statements[0]),
        ExprKind::Embed { model: None, .. }
    ));
    let ExprKind::Embed { model, .. } = kind(&module, statements[1]) else {
        panic!("expected embed");
    };
    assert_eq!(model, Some(interner.intern("mini")));
}

#[test]
fn ai_call_takes_model_then_arguments() {
    let interner = StringInterner::new();
    let module = parse_ok("AI weather(\"today\", 3)", &interner);
    let ExprKind::AiCall { model, args } = only_statement(&module) else {
        panic!("expected ai call");
    };
    assert_eq!(interner.lookup(model), "weather");
    assert_eq!(args.len(), 2);
}

#[test]
fn list_literal_and_index() {
    let interner = StringInterner::new();
    let module = parse_ok("[10, 20,\n 30][-1]", &interner);
    let ExprKind::Index { target, index } = only_statement(&module) else {
        panic!("expected index");
    };
    let ExprKind::List(elements) = kind(&module, target) else {
        panic!("expected list");
    };
    assert_eq!(elements.len(), 3);
    assert!(matches!(kind(&module, index), ExprKind::Unary { .. }));
}

#[test]
fn semicolons_separate_statements() {
    let interner = StringInterner::new();
    let module = parse_ok("var a = 1; var b = 2;\n\n", &interner);
    assert_eq!(module.statements().len(), 2);
}

#[test]
fn syntax_errors_report_line_and_column() {
    let interner = StringInterner::new();
    let err = parse("var x = 1\nvar = 2", &interner).unwrap_err();
    assert_eq!(err.line, Some(2));
    assert_eq!(err.column, Some(5));
    assert_eq!(err.message, "expected identifier, found '='");
}

#[test]
fn missing_end_is_an_error() {
    let interner = StringInterner::new();
    let err = parse("while x then\n  print(x)\n", &interner).unwrap_err();
    assert_eq!(err.message, "expected 'END', found end of file");
}

#[test]
fn lex_errors_surface_as_compilation_errors() {
    let interner = StringInterner::new();
    let err = parse("x = !y", &interner).unwrap_err();
    assert_eq!(err.message, "illegal character '!'");
    assert_eq!(err.column, Some(5));
}

#[test]
fn duplicate_parameters_are_rejected() {
    let interner = StringInterner::new();
    let err = parse("fun f(a, a) -> a", &interner).unwrap_err();
    assert_eq!(err.message, "duplicate parameter name");
}
