//! Turtle state and the actions that drive it.

use crate::error::{Error, Result};
use crate::mesh::{Material, MeshData, MeshSource, Transform, euler_quat};
use crate::symbol::Symbol;
use glam::Vec3;
use std::fmt;
use std::sync::Arc;

/// The stack of frames walked by the interpreter.
///
/// Positions and rotations live on two parallel stacks that always share the
/// same depth. The top of both is the current frame. The state starts with a
/// single identity frame and can never drop below it.
#[derive(Clone, Debug)]
pub struct TurtleState {
    positions: Vec<Vec3>,
    rotations: Vec<Vec3>,
}

impl Default for TurtleState {
    fn default() -> Self {
        Self {
            positions: vec![Vec3::ZERO],
            rotations: vec![Vec3::ZERO],
        }
    }
}

impl TurtleState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of frames on the stack; `1` when nothing is saved.
    pub fn depth(&self) -> usize {
        self.positions.len()
    }

    pub fn position(&self) -> Vec3 {
        self.positions.last().copied().unwrap_or_default()
    }

    /// Current rotation as Euler angles in degrees.
    pub fn rotation(&self) -> Vec3 {
        self.rotations.last().copied().unwrap_or_default()
    }

    pub fn position_mut(&mut self) -> &mut Vec3 {
        let last = self.positions.len() - 1;
        &mut self.positions[last]
    }

    pub fn rotation_mut(&mut self) -> &mut Vec3 {
        let last = self.rotations.len() - 1;
        &mut self.rotations[last]
    }

    /// The current frame as an instance transform with unit scale.
    pub fn transform(&self) -> Transform {
        Transform::new(self.position(), self.rotation())
    }

    /// The local up axis (`+Y`) rotated into world space by the current frame.
    pub fn forward(&self) -> Vec3 {
        euler_quat(self.rotation()) * Vec3::Y
    }

    /// Moves the current frame `distance` units along [`forward`](Self::forward).
    pub fn advance(&mut self, distance: f32) {
        let step = self.forward() * distance;
        *self.position_mut() += step;
    }

    /// Adds `delta` degrees to the current rotation. Angles are not wrapped.
    pub fn rotate(&mut self, delta: Vec3) {
        *self.rotation_mut() += delta;
    }

    /// Pushes a copy of the current frame.
    pub fn save(&mut self) {
        self.positions.push(self.position());
        self.rotations.push(self.rotation());
    }

    /// Pops the current frame, returning to its parent.
    ///
    /// Returns `false` and leaves the state untouched when only the initial
    /// frame remains.
    pub fn restore(&mut self) -> bool {
        if self.depth() <= 1 {
            return false;
        }
        self.positions.pop();
        self.rotations.pop();
        true
    }
}

/// Identifies one distinct (mesh, material) pair known to a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShapeId(pub u32);

/// Emits an instance of a fixed mesh and material at the current frame.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawAction {
    name: String,
    mesh: MeshData,
    material: Material,
}

impl DrawAction {
    pub fn builder() -> DrawActionBuilder {
        DrawActionBuilder::default()
    }

    /// Builds a Draw action from a mesh source, generating its mesh once.
    pub fn new(source: &dyn MeshSource, material: Material) -> Self {
        Self {
            name: source.name().to_owned(),
            mesh: source.generate_mesh(),
            material,
        }
    }

    /// Label of the mesh source this action was built from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn material(&self) -> &Material {
        &self.material
    }
}

/// Builder for [`DrawAction`]. Building without a mesh source fails.
#[derive(Default)]
pub struct DrawActionBuilder {
    source: Option<Box<dyn MeshSource>>,
    material: Material,
}

impl DrawActionBuilder {
    pub fn mesh(mut self, source: impl MeshSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }

    pub fn build(self) -> Result<DrawAction> {
        let source = self.source.ok_or(Error::MissingMeshSource)?;
        Ok(DrawAction::new(source.as_ref(), self.material))
    }
}

type CustomFn = dyn Fn(Symbol, &mut TurtleState) -> Result<()> + Send + Sync;

/// A caller-supplied action operating directly on the turtle state.
#[derive(Clone)]
pub struct CustomAction {
    name: String,
    func: Arc<CustomFn>,
}

impl CustomAction {
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(Symbol, &mut TurtleState) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, symbol: Symbol, state: &mut TurtleState) -> Result<()> {
        (self.func)(symbol, state)
    }
}

impl fmt::Debug for CustomAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomAction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// What a symbol does when the interpreter reaches it.
#[derive(Clone, Debug)]
pub enum Action {
    /// Record an instance of the shape at the current frame.
    Draw(ShapeId),
    /// Step along the current forward direction. Negative distances step back.
    Move(f32),
    /// Add a fixed Euler delta (degrees) to the current rotation.
    Rotate(Vec3),
    /// Push a copy of the current frame (`[`).
    Save,
    /// Return to the most recently saved frame (`]`).
    Restore,
    Custom(CustomAction),
}

impl Action {
    /// Short label for diagnostics, e.g. `"Move"` or `"Restore"`.
    pub fn kind(&self) -> &str {
        match self {
            Self::Draw(_) => "Draw",
            Self::Move(_) => "Move",
            Self::Rotate(_) => "Rotate",
            Self::Save => "Save",
            Self::Restore => "Restore",
            Self::Custom(custom) => custom.name(),
        }
    }
}
