// tests/turtle_interpretation.rs
use glam::Vec3;
use tree_generator::{
    Action, CustomAction, DrawAction, Error, LSystem, Material, MeshData, MeshGenerator, MeshShape,
    MeshSource, RuleTable, ShapeId, Symbol, Transform, TurtleConfig, TurtleState, generate, iterate,
    symbols,
};

const EPS: f32 = 1e-5;

fn sym(c: char) -> Symbol {
    Symbol::new(c)
}

fn draw(shape: MeshShape) -> DrawAction {
    DrawAction::builder().mesh(shape).build().unwrap()
}

fn draw_mesh(mesh: MeshData) -> DrawAction {
    DrawAction::builder().mesh(mesh).build().unwrap()
}

/// `D` draws a cylinder, `M` moves one unit, `+` turns 90 degrees around z,
/// `[`/`]` save and restore.
fn setup() -> MeshGenerator {
    let mut generator = MeshGenerator::new();
    generator.define_draw(sym('D'), draw(MeshShape::cylinder(0.1, 1.0)));
    generator.define_move(sym('M'), 1.0);
    generator.define_rotate(sym('+'), Vec3::new(0.0, 0.0, 90.0));
    generator.define_save(sym('['));
    generator.define_restore(sym(']'));
    generator
}

fn assert_vec_eq(actual: Vec3, expected: Vec3) {
    assert!(
        actual.abs_diff_eq(expected, EPS),
        "expected {expected:?}, got {actual:?}"
    );
}

#[test]
fn test_empty_sequence_produces_nothing() {
    let groups = setup().generate(&[]).unwrap();
    assert!(groups.is_empty());
}

#[test]
fn test_no_definitions_produce_nothing() {
    let groups = MeshGenerator::new().generate(&symbols("F[+F]F")).unwrap();
    assert!(groups.is_empty());
}

#[test]
fn test_save_draw_restore_keeps_initial_frame() {
    let groups = setup().generate(&symbols("[D]")).unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].instances, vec![Transform::IDENTITY]);
}

#[test]
fn test_save_restore_depth() {
    let mut state = TurtleState::new();
    assert_eq!(state.depth(), 1);

    state.save();
    state.advance(2.0);
    state.rotate(Vec3::new(0.0, 0.0, 45.0));
    assert_eq!(state.depth(), 2);

    assert!(state.restore());
    assert_eq!(state.depth(), 1);
    assert_eq!(state.transform(), Transform::IDENTITY);

    assert!(!state.restore(), "initial frame must never be popped");
    assert_eq!(state.depth(), 1);
}

#[test]
fn test_move_follows_local_up() {
    let groups = setup().generate(&symbols("MD")).unwrap();
    assert_vec_eq(groups[0].instances[0].position, Vec3::Y);
}

#[test]
fn test_rotate_then_move_around_z() {
    // Rolling +Y by 90 degrees around z points it at -X.
    let groups = setup().generate(&symbols("+MD")).unwrap();
    let instance = groups[0].instances[0];

    assert_vec_eq(instance.position, Vec3::NEG_X);
    assert_eq!(instance.rotation, Vec3::new(0.0, 0.0, 90.0));
    assert_eq!(instance.scale, 1.0);
}

#[test]
fn test_rotate_then_move_around_x() {
    let mut state = TurtleState::new();
    state.rotate(Vec3::new(90.0, 0.0, 0.0));
    state.advance(2.0);
    assert_vec_eq(state.position(), Vec3::new(0.0, 0.0, 2.0));
}

#[test]
fn test_rotation_applies_z_then_y_then_x() {
    // x first: +Y -> +Z, then z leaves +Z alone.
    // Applied the other way round the result would be -X.
    let mut state = TurtleState::new();
    state.rotate(Vec3::new(90.0, 0.0, 90.0));
    assert_vec_eq(state.forward(), Vec3::Z);

    state.advance(1.0);
    assert_vec_eq(state.position(), Vec3::Z);
}

#[test]
fn test_yaw_applies_after_pitch() {
    // x: +Y -> +Z, then y: +Z -> +X. Pitching last would give +Z.
    let mut state = TurtleState::new();
    state.rotate(Vec3::new(90.0, 90.0, 0.0));
    assert_vec_eq(state.forward(), Vec3::X);
}

#[test]
fn test_roll_applies_after_yaw() {
    // y leaves +Y alone, then z: +Y -> -X.
    let mut state = TurtleState::new();
    state.rotate(Vec3::new(0.0, 90.0, 90.0));
    assert_vec_eq(state.forward(), Vec3::NEG_X);

    // All three: x gives +Z, y gives +X, z gives +Y.
    let mut state = TurtleState::new();
    state.rotate(Vec3::new(90.0, 90.0, 90.0));
    assert_vec_eq(state.forward(), Vec3::Y);
}

#[test]
fn test_negative_move_steps_backwards() {
    let mut generator = setup();
    generator.define_move(sym('B'), -0.5);
    let groups = generator.generate(&symbols("BD")).unwrap();
    assert_vec_eq(groups[0].instances[0].position, Vec3::new(0.0, -0.5, 0.0));
}

#[test]
fn test_rotation_is_not_wrapped() {
    let mut generator = setup();
    generator.define_rotate(sym('R'), Vec3::new(0.0, 0.0, 200.0));
    let groups = generator.generate(&symbols("RRD")).unwrap();
    assert_eq!(groups[0].instances[0].rotation, Vec3::new(0.0, 0.0, 400.0));
}

#[test]
fn test_groups_keep_first_seen_order() {
    let mut generator = setup();
    let a = generator.define_draw(sym('A'), draw(MeshShape::cylinder(0.1, 1.0)));
    let b = generator.define_draw(sym('B'), draw(MeshShape::sphere(0.2)));

    let groups = generator.generate(&symbols("AMBMA")).unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].shape, a);
    assert_eq!(groups[1].shape, b);

    let a_positions: Vec<Vec3> = groups[0].instances.iter().map(|t| t.position).collect();
    assert_eq!(a_positions.len(), 2);
    assert_vec_eq(a_positions[0], Vec3::ZERO);
    assert_vec_eq(a_positions[1], Vec3::new(0.0, 2.0, 0.0));

    assert_eq!(groups[1].instances.len(), 1);
    assert_vec_eq(groups[1].instances[0].position, Vec3::Y);
}

#[test]
fn test_symbols_drawing_same_shape_share_group() {
    let mut generator = setup();
    let a = generator.define_draw(sym('A'), draw(MeshShape::cylinder(0.1, 1.0)));
    let b = generator.define_draw(sym('B'), draw(MeshShape::cylinder(0.1, 1.0)));
    assert_eq!(a, b);

    let groups = generator.generate(&symbols("AB")).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].instances.len(), 2);
}

#[test]
fn test_same_mesh_different_material_splits_groups() {
    let mut generator = MeshGenerator::new();
    let bark = Material::from_rgba(0.4, 0.25, 0.1, 1.0);
    let leaf = Material::from_rgba(0.1, 0.6, 0.2, 1.0);
    let quad = MeshShape::quad(0.2, 0.3);

    let a = generator.define_draw(
        sym('A'),
        DrawAction::builder()
            .mesh(quad)
            .material(bark)
            .build()
            .unwrap(),
    );
    let b = generator.define_draw(
        sym('B'),
        DrawAction::builder()
            .mesh(quad)
            .material(leaf)
            .build()
            .unwrap(),
    );
    assert_ne!(a, b);

    let groups = generator.generate(&symbols("BA")).unwrap();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].material, leaf);
    assert_eq!(groups[1].material, bark);
}

#[test]
fn test_undefined_symbols_are_ignored() {
    let groups = setup().generate(&symbols("xDy?z")).unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].instances, vec![Transform::IDENTITY]);
}

#[test]
fn test_action_redefinition_uses_most_recent() {
    let mut generator = setup();
    generator.define_move(sym('M'), 3.0);
    let groups = generator.generate(&symbols("MD")).unwrap();
    assert_vec_eq(groups[0].instances[0].position, Vec3::new(0.0, 3.0, 0.0));
}

#[test]
fn test_lone_restore_underflows() {
    match setup().generate(&symbols("]")) {
        Err(Error::StackUnderflow { index, symbol }) => {
            assert_eq!(index, 0);
            assert_eq!(symbol, sym(']'));
        }
        other => panic!("expected stack underflow, got {other:?}"),
    }
}

#[test]
fn test_underflow_discards_partial_output() {
    let result = setup().generate(&symbols("D[D]]D"));
    assert!(matches!(
        result,
        Err(Error::StackUnderflow { index: 4, .. })
    ));
}

#[test]
fn test_unmatched_saves_are_discarded() {
    let groups = setup().generate(&symbols("[[MD")).unwrap();
    assert_eq!(groups.len(), 1);
    assert_vec_eq(groups[0].instances[0].position, Vec3::Y);
}

#[test]
fn test_branch_and_continue() {
    // Axiom F, F -> F[+F]F, then each F decomposed into draw-then-move.
    let lsystem = LSystem::new(symbols("F"), RuleTable::new().with_rule('F', "F[+F]F"));
    let expanded = generate(&lsystem, 1);
    let segments = iterate(&expanded, &RuleTable::new().with_rule('F', "DM"));

    let groups = setup().generate(&segments).unwrap();
    assert_eq!(groups.len(), 1);

    let instances = &groups[0].instances;
    assert_eq!(instances.len(), 3);

    // Trunk at the origin.
    assert_eq!(instances[0], Transform::IDENTITY);

    // Branch starts on top of the trunk, turned by 90 degrees.
    assert_vec_eq(instances[1].position, Vec3::Y);
    assert_eq!(instances[1].rotation, Vec3::new(0.0, 0.0, 90.0));

    // Continuation resumes from the saved frame, unrotated.
    assert_vec_eq(instances[2].position, Vec3::Y);
    assert_eq!(instances[2].rotation, Vec3::ZERO);
}

#[test]
fn test_standard_symbols() {
    let mut generator = MeshGenerator::new();
    generator.populate_standard_symbols(&TurtleConfig {
        step: 2.0,
        angle: 90.0,
    });
    generator.define_draw(sym('F'), draw(MeshShape::cuboid(0.1, 1.0, 0.1)));

    let groups = generator.generate(&symbols("f[+fF]&fF")).unwrap();
    let instances = &groups[0].instances;

    assert_vec_eq(instances[0].position, Vec3::new(-2.0, 2.0, 0.0));
    assert_vec_eq(instances[1].position, Vec3::new(0.0, 2.0, 2.0));
}

#[test]
fn test_custom_action_mutates_frame() {
    let mut generator = setup();
    generator.define_custom(
        sym('J'),
        CustomAction::new("Jump", |_, state| {
            *state.position_mut() = Vec3::new(5.0, 0.0, 0.0);
            Ok(())
        }),
    );

    let groups = generator.generate(&symbols("JD")).unwrap();
    assert_eq!(groups[0].instances[0].position, Vec3::new(5.0, 0.0, 0.0));
    assert_eq!(generator.describe(sym('J')).as_deref(), Some("Jump"));
}

#[test]
fn test_custom_action_error_aborts() {
    let mut generator = setup();
    generator.define_custom(
        sym('X'),
        CustomAction::new("Fail", |symbol, _| {
            Err(Error::CustomAction {
                name: "Fail".into(),
                message: format!("refused {symbol}"),
            })
        }),
    );

    let result = generator.generate(&symbols("DX"));
    assert!(matches!(result, Err(Error::CustomAction { .. })));
}

#[test]
fn test_draw_requires_mesh_source() {
    let result = DrawAction::builder().material(Material::default()).build();
    assert!(matches!(result, Err(Error::MissingMeshSource)));
}

#[test]
fn test_define_rejects_foreign_shape() {
    let mut generator = MeshGenerator::new();
    let result = generator.define(sym('A'), Action::Draw(ShapeId(7)));
    assert!(matches!(result, Err(Error::UnknownShape(7))));
    assert!(generator.action(sym('A')).is_none());
}

#[test]
fn test_describe_keeps_source_name_for_shared_shape() {
    let mut generator = setup();
    let raw = MeshShape::cylinder(0.1, 1.0).generate_mesh();
    let shared = generator.define_draw(sym('R'), draw_mesh(raw));

    assert_eq!(generator.action(sym('D')).map(Action::kind), Some("Draw"));
    let cylinder = generator.define_draw(sym('C'), draw(MeshShape::cylinder(0.1, 1.0)));
    assert_eq!(cylinder, shared);
    assert_eq!(generator.describe(sym('R')).as_deref(), Some("Draw: Mesh"));
    assert_eq!(
        generator.describe(sym('D')).as_deref(),
        Some("Draw: Cylinder")
    );

    generator.define_move(sym('R'), 1.0);
    assert_eq!(generator.describe(sym('R')).as_deref(), Some("Move"));
}

#[test]
fn test_describe_bindings() {
    let generator = setup();
    assert_eq!(
        generator.describe(sym('D')).as_deref(),
        Some("Draw: Cylinder")
    );
    assert_eq!(generator.describe(sym('M')).as_deref(), Some("Move"));
    assert_eq!(generator.describe(sym(']')).as_deref(), Some("Restore"));
    assert_eq!(generator.describe(sym('q')), None);

    let bound: Vec<char> = generator
        .bindings()
        .iter()
        .map(|(s, _)| s.as_char())
        .collect();
    assert_eq!(bound, vec!['+', 'D', 'M', '[', ']']);
}

#[test]
fn test_interpretation_is_deterministic() {
    let generator = setup();
    let input = symbols("D[+MD]MD[+M+MD]");
    assert_eq!(
        generator.generate(&input).unwrap(),
        generator.generate(&input).unwrap()
    );
}

#[test]
fn test_instance_matrix() {
    let transform = Transform::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, 90.0));
    let matrix = transform.to_matrix();

    assert_vec_eq(
        matrix.transform_point3(Vec3::ZERO),
        Vec3::new(1.0, 2.0, 3.0),
    );
    assert_vec_eq(matrix.transform_vector3(Vec3::Y), Vec3::NEG_X);
}
