use super::*;
use crate::{buffer_handler, PlaceholderModels};
use ml_ir::SharedInterner;
use pretty_assertions::assert_eq;

struct Run {
    result: EvalResult,
    output: String,
    machine: Machine,
}

fn run_with(source: &str, configure: impl FnOnce(Machine) -> Machine) -> Run {
    let interner = SharedInterner::default();
    let module = match ml_parse::parse(source, &interner) {
        Ok(module) => module,
        Err(err) => panic!("parse failed: {err} at {:?}", err.location()),
    };
    let out = buffer_handler();
    let mut machine = configure(Machine::new(interner).with_print_handler(out.clone()));
    let result = run_module(&mut machine, module);
    Run {
        result,
        output: out.output(),
        machine,
    }
}

fn run(source: &str) -> Run {
    run_with(source, |machine| machine)
}

fn output(source: &str) -> String {
    let run = run(source);
    if let Err(err) = run.result {
        panic!("runtime error: {err}");
    }
    run.output
}

#[test]
fn sum_and_mean() {
    let source = "\
fun sum(list)
    var total = 0
    for i = 0 to len(list) then
        var total = total + list[i]
    end
    return total
end

var numbers = [10, 20, 30, 40, 50]
var s = sum(numbers)
print(\"Sum: \" + s)
print(\"Mean: \" + s / len(numbers))
";
    let run = run(source);
    assert_eq!(run.result, Ok(Value::NULL));
    assert_eq!(run.output, "Sum: 150\nMean: 30\n");
    assert_eq!(run.machine.scopes.live_count(), 1);
}

#[test]
fn functions_declare_locals_instead_of_mutating_globals() {
    let source = "\
var x = 1
fun f() -> var x = 2
print(f(), x)
";
    assert_eq!(output(source), "2 1\n");
}

#[test]
fn top_level_loops_mutate_globals() {
    let source = "\
var n = 0
var squares = for i = 0 to 4 then var n = n + i
print(n, squares)
";
    assert_eq!(output(source), "6 [0, 1, 3, 6]\n");
}

#[test]
fn loop_variables_are_scoped_to_the_iteration() {
    let run = run("for i = 0 to 2 then i\nprint(i)");
    assert_eq!(run.result, Err(RuntimeError::UndefinedVariable("i".into())));
}

#[test]
fn counted_loops_honor_step_direction() {
    let source = "\
print(for i = 0 to 5 step 2 then i * i)
print(for i = 3 to 0 step -1 then i)
print(for i = 0 to 0 then i)
";
    assert_eq!(output(source), "[0, 4, 16]\n[3, 2, 1]\n[]\n");
}

#[test]
fn closures_outlive_their_call() {
    let source = "\
fun adder(n) -> fun (x) -> x + n
var add2 = adder(2)
print(add2(5), add2(10), add2)
";
    assert_eq!(output(source), "7 12 <function anonymous>\n");
}

#[test]
fn named_functions_recurse() {
    let source = "\
fun fact(n) -> if n <= 1 then 1 else n * fact(n - 1)
print(fact(5))
";
    assert_eq!(output(source), "120\n");
}

#[test]
fn pipes_prepend_the_piped_value() {
    let source = "\
fun double(x) -> x * 2
fun add(a, b) -> a - b
print(3 | double | add(1))
print(double(double(3)) == (3 | double | double))
";
    assert_eq!(output(source), "5\n1\n");
}

#[test]
fn while_with_break_and_continue() {
    let source = "\
var i = 0
var seen = []
while true then
    var i = i + 1
    if i == 3 then
        continue
    end
    if i > 5 then
        break
    end
    append(seen, i)
end
print(seen)
";
    let run = run(source);
    assert_eq!(run.output, "[1, 2, 4, 5]\n");
    assert_eq!(run.machine.scopes.live_count(), 1);
}

#[test]
fn return_from_nested_loop_releases_scopes() {
    let source = "\
fun find(list, target)
    for i = 0 to len(list) then
        if list[i] == target then
            return i
        end
    end
    return -1
end
print(find([4, 5, 6], 6), find([1], 9))
";
    let run = run(source);
    assert_eq!(run.output, "2 -1\n");
    assert_eq!(run.machine.scopes.live_count(), 1);
}

#[test]
fn block_bodies_without_return_yield_null() {
    assert_eq!(output("fun g()\n    5\nend\nprint(g())"), "0\n");
}

#[test]
fn inline_if_yields_and_block_if_does_not() {
    let source = "\
var x = -4
var sign = if x < 0 then -1 elif x == 0 then 0 else 1
var block = if true then
    99
end
print(sign, block)
";
    assert_eq!(output(source), "-1 0\n");
}

#[test]
fn runtime_errors_stop_the_program() {
    let first = run("print(1)\nprint(1 / 0)\nprint(2)");
    assert_eq!(first.result, Err(RuntimeError::DivisionByZero));
    assert_eq!(first.output, "1\n");

    assert_eq!(
        run("fun f(a) -> a\nf(1, 2)").result,
        Err(RuntimeError::ArityMismatch {
            name: "f".into(),
            expected: 1,
            got: 2
        })
    );
    assert_eq!(
        run("var x = 3\nx(1)").result.unwrap_err().to_string(),
        "unsupported operation 'call' on Number"
    );
}

#[test]
fn printing_a_list_appended_to_itself_terminates() {
    let source = "\
var l = [1]
append(l, l)
print(l)
print(len(copy(l)))
";
    assert_eq!(output(source), "[1, [...]]\n2\n");
}

#[test]
fn embed_uses_the_default_model() {
    let source = "\
var v = embed \"hello\"
print(len(v), v[0], v[-1])
embed \"again\" with \"small\"
";
    assert_eq!(
        output(source),
        "Embedding text with model: default\n10 0 0.9\nEmbedding text with model: small\n"
    );
    assert!(run("embed 5").result.is_err());
}

#[test]
fn ai_calls_use_registered_handlers() {
    let source = "\
print(AI weather(\"today\", 3))
print(AI other())
";
    let run = run_with(source, |machine| {
        machine.with_models(PlaceholderModels::new().with_handler("weather", |args| {
            Ok(Value::text(format!("sunny x{}", args.len())))
        }))
    });
    assert_eq!(
        run.output,
        "sunny x2\nCalling AI model: other\nAI model response\n"
    );
}

#[test]
fn sequences_alias_until_copied() {
    let source = "\
var a = [1, 2]
var b = a
var c = copy(a)
append(b, 3)
print(a, c)
";
    assert_eq!(output(source), "[1, 2, 3] [1, 2]\n");
}

#[test]
fn text_operations() {
    let source = "\
print(\"ab\" * 3, \"[\" + \"ab\" * 0 + \"]\", \"n=\" + 2.5)
print(len(\"hello\"), \"a\" == \"a\", 1 == \"1\")
";
    assert_eq!(output(source), "ababab [] n=2.5\n5 1 0\n");
}

#[test]
fn top_level_return_ends_the_program() {
    let run = run("print(1)\nreturn 7\nprint(2)");
    assert_eq!(run.result, Ok(Value::Number(7.0)));
    assert_eq!(run.output, "1\n");
}
