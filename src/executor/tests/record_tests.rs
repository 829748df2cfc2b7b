//! Tests for record declarations, construction and rendering

use super::super::*;
use super::helpers::{dumped_text, parse_script_and_build_vm};
use crate::render::RenderNode;

#[test]
fn test_new_record_defaults_missing_fields_to_null() {
    let source = r#"
record Point { x, y, label }
return new Point { x: 1, y: 2 }
"#;
    let (mut vm, _) = parse_script_and_build_vm(source, &[]);
    run_until_done(&mut vm);

    let Control::Return(Val::Record(point)) = &vm.control else {
        panic!("Expected a record, got {:?}", vm.control);
    };
    assert_eq!(point.type_name().to_string(), "Point");
    assert_eq!(point.get("x"), Some(&Val::Num(1.0)));
    assert_eq!(point.get("y"), Some(&Val::Num(2.0)));
    assert_eq!(point.get("label"), Some(&Val::Null));
    assert_eq!(point.get("z"), None);
}

#[test]
fn test_record_declared_after_use() {
    let source = r#"
const p = new Pair { left: "a", right: "b" }
record Pair { left, right }
return p.left + p.right
"#;
    let (mut vm, _) = parse_script_and_build_vm(source, &[]);
    run_until_done(&mut vm);
    assert_eq!(vm.control, Control::Return(Val::from("ab")));
}

#[test]
fn test_record_field_assignment() {
    let source = r#"
record Counter { value }
let c = new Counter { value: 1 }
c.value = c.value + 1
c["value"] = c["value"] * 10
return c.value
"#;
    let (mut vm, _) = parse_script_and_build_vm(source, &[]);
    run_until_done(&mut vm);
    assert_eq!(vm.control, Control::Return(Val::Num(20.0)));
}

#[test]
fn test_record_string_form_skips_hidden_fields() {
    let source = r#"
record User { name, hidden password }
Cauldron.dump(new User { name: "ada", password: "secret" })
"#;
    let (mut vm, dumps) = parse_script_and_build_vm(source, &[]);
    run_until_done(&mut vm);

    assert_eq!(vm.control, Control::None);
    assert_eq!(dumped_text(&dumps), vec![r#"User { name: "ada" }"#]);
}

#[test]
fn test_records_of_one_type_render_as_table() {
    let source = r#"
record Person { name, age as "Age (years)", hidden id }
Cauldron.dump([
    new Person { name: "Ada", age: 36, id: 1 },
    null,
    new Person { name: "Alan", id: 2 },
])
"#;
    let (mut vm, dumps) = parse_script_and_build_vm(source, &[]);
    run_until_done(&mut vm);

    let dumps = dumps.lock().unwrap();
    assert_eq!(dumps.len(), 1);
    let table = dumps[0].as_table().expect("table");
    assert_eq!(table.caption, "List<Person>");
    assert_eq!(table.columns, vec!["name", "Age (years)"]);
    assert_eq!(
        table.rows,
        vec![
            vec![RenderNode::text("Ada"), RenderNode::text("36")],
            vec![RenderNode::Null, RenderNode::Null],
            vec![RenderNode::text("Alan"), RenderNode::Null],
        ]
    );
}

#[test]
fn test_record_cells_render_recursively() {
    let source = r#"
record Team { name, members }
Cauldron.dump([new Team { name: "core", members: [1, 2] }])
"#;
    let (mut vm, dumps) = parse_script_and_build_vm(source, &[]);
    run_until_done(&mut vm);

    let dumps = dumps.lock().unwrap();
    let table = dumps[0].as_table().expect("table");
    assert_eq!(table.columns, vec!["name", "members"]);

    let nested = table.rows[0][1].as_table().expect("nested table");
    assert_eq!(nested.caption, "List<Number>");
    assert_eq!(
        nested.rows,
        vec![vec![RenderNode::text("1")], vec![RenderNode::text("2")]]
    );
}

#[test]
fn test_mixed_record_types_fall_back_to_text() {
    let source = r#"
record A { x }
record B { x }
Cauldron.dump([new A { x: 1 }, new B { x: 2 }])
"#;
    let (mut vm, dumps) = parse_script_and_build_vm(source, &[]);
    run_until_done(&mut vm);

    assert_eq!(dumped_text(&dumps), vec!["[A { x: 1 }, B { x: 2 }]"]);
}

#[test]
fn test_for_in_record_yields_field_names() {
    let source = r#"
record Row { a, hidden b }
for (const field in new Row { a: 1, b: 2 }) Cauldron.dump(field)
"#;
    let (mut vm, dumps) = parse_script_and_build_vm(source, &[]);
    run_until_done(&mut vm);
    assert_eq!(dumped_text(&dumps), vec!["a", "b"]);
}
