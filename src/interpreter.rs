//! Interpreter that converts an expanded symbol sequence into instanced geometry.
//!
//! The entry point is [`MeshGenerator`]. Bind symbols to actions via the
//! `define_*` methods or [`MeshGenerator::populate_standard_symbols`], then call
//! [`MeshGenerator::generate`] with the output of [`crate::lsystem::generate`].

use crate::error::{Error, Result};
use crate::mesh::{Material, MeshData, Transform};
use crate::symbol::Symbol;
use crate::turtle::{Action, CustomAction, DrawAction, ShapeId, TurtleState};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument, trace, warn};

/// Parameters for the conventional turtle symbols.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurtleConfig {
    /// Distance covered by `f`.
    pub step: f32,
    /// Angle in degrees used by the turn, pitch and roll symbols.
    pub angle: f32,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            step: 1.0,
            angle: 25.0,
        }
    }
}

/// One drawable shape together with every place it was drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshGroup {
    pub shape: ShapeId,
    pub mesh: MeshData,
    pub material: Material,
    /// Instances in the order they were drawn.
    pub instances: Vec<Transform>,
}

/// Action registry and turtle interpreter.
///
/// Each symbol maps to at most one [`Action`]; defining a symbol again replaces
/// its binding. Symbols without a binding are skipped during interpretation.
#[derive(Clone, Debug, Default)]
pub struct MeshGenerator {
    actions: HashMap<Symbol, Action>,
    shapes: Vec<DrawAction>,
    /// Mesh source label per draw binding; shared shapes keep their own names.
    draw_names: HashMap<Symbol, String>,
}

impl MeshGenerator {
    /// Creates a generator with no bindings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `symbol` to `action`, replacing any previous binding.
    ///
    /// Fails if `action` draws a [`ShapeId`] this generator never issued.
    pub fn define(&mut self, symbol: Symbol, action: Action) -> Result<()> {
        if let Action::Draw(id) = &action
            && self.shape(*id).is_none()
        {
            return Err(Error::UnknownShape(id.0));
        }
        self.bind(symbol, action);
        Ok(())
    }

    /// Binds `symbol` to draw `draw`'s mesh and material.
    ///
    /// Draw actions with structurally equal mesh and material share a
    /// [`ShapeId`], and therefore share one [`MeshGroup`] in the output.
    pub fn define_draw(&mut self, symbol: Symbol, draw: DrawAction) -> ShapeId {
        let name = draw.name().to_owned();
        let id = self.intern_shape(draw);
        trace!(%symbol, shape = id.0, %name, "action defined");
        self.actions.insert(symbol, Action::Draw(id));
        self.draw_names.insert(symbol, name);
        id
    }

    pub fn define_move(&mut self, symbol: Symbol, distance: f32) {
        self.bind(symbol, Action::Move(distance));
    }

    /// Binds a rotation delta in degrees (x = pitch, y = yaw, z = roll).
    pub fn define_rotate(&mut self, symbol: Symbol, delta: Vec3) {
        self.bind(symbol, Action::Rotate(delta));
    }

    pub fn define_save(&mut self, symbol: Symbol) {
        self.bind(symbol, Action::Save);
    }

    pub fn define_restore(&mut self, symbol: Symbol) {
        self.bind(symbol, Action::Restore);
    }

    pub fn define_custom(&mut self, symbol: Symbol, action: CustomAction) {
        self.bind(symbol, Action::Custom(action));
    }

    /// Registers the conventional turtle symbols.
    ///
    /// `f` moves by `config.step`; `+`/`-` roll around z, `&`/`^` pitch around x
    /// and `\`/`/` yaw around y by `config.angle`; `|` turns around; `[`/`]`
    /// save and restore. Drawing symbols are left to the caller.
    pub fn populate_standard_symbols(&mut self, config: &TurtleConfig) {
        let a = config.angle;
        let mappings = [
            ('f', Action::Move(config.step)),
            ('+', Action::Rotate(Vec3::new(0.0, 0.0, a))),
            ('-', Action::Rotate(Vec3::new(0.0, 0.0, -a))),
            ('&', Action::Rotate(Vec3::new(a, 0.0, 0.0))),
            ('^', Action::Rotate(Vec3::new(-a, 0.0, 0.0))),
            ('\\', Action::Rotate(Vec3::new(0.0, a, 0.0))),
            ('/', Action::Rotate(Vec3::new(0.0, -a, 0.0))),
            ('|', Action::Rotate(Vec3::new(0.0, 0.0, 180.0))),
            ('[', Action::Save),
            (']', Action::Restore),
        ];

        for (c, action) in mappings {
            self.bind(Symbol::new(c), action);
        }
    }

    pub fn action(&self, symbol: Symbol) -> Option<&Action> {
        self.actions.get(&symbol)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&DrawAction> {
        self.shapes.get(id.0 as usize)
    }

    /// All bindings, ordered by symbol.
    pub fn bindings(&self) -> Vec<(Symbol, &Action)> {
        let mut bindings: Vec<_> = self.actions.iter().map(|(s, a)| (*s, a)).collect();
        bindings.sort_by_key(|(s, _)| *s);
        bindings
    }

    /// Human-readable label of the action bound to `symbol`, e.g. `"Draw: Cylinder"`.
    ///
    /// Draws report the mesh source they were defined with, even when their
    /// shape is shared with a binding defined from another source.
    pub fn describe(&self, symbol: Symbol) -> Option<String> {
        let action = self.action(symbol)?;
        Some(match action {
            Action::Draw(id) => {
                let name = self
                    .draw_names
                    .get(&symbol)
                    .map(String::as_str)
                    .or_else(|| self.shape(*id).map(DrawAction::name));
                match name {
                    Some(name) => format!("Draw: {name}"),
                    None => "Draw".to_owned(),
                }
            }
            other => other.kind().to_owned(),
        })
    }

    /// Interprets `symbols` left to right and returns the collected mesh groups.
    ///
    /// The turtle starts at the origin with zero rotation. Groups appear in the
    /// order their shape was first drawn. Frames still saved at the end are
    /// discarded; a Restore with nothing saved aborts the whole pass with
    /// [`Error::StackUnderflow`].
    #[instrument(skip_all, fields(symbols = symbols.len()))]
    pub fn generate(&self, symbols: &[Symbol]) -> Result<Vec<MeshGroup>> {
        let mut state = TurtleState::new();
        let mut groups: Vec<MeshGroup> = Vec::new();
        let mut group_index: HashMap<ShapeId, usize> = HashMap::new();

        for (index, &symbol) in symbols.iter().enumerate() {
            let Some(action) = self.actions.get(&symbol) else {
                continue;
            };
            trace!(index, %symbol, action = action.kind(), "dispatch");

            match action {
                Action::Draw(id) => {
                    let Some(draw) = self.shape(*id) else {
                        return Err(Error::UnknownShape(id.0));
                    };
                    let slot = *group_index.entry(*id).or_insert_with(|| {
                        groups.push(MeshGroup {
                            shape: *id,
                            mesh: draw.mesh().clone(),
                            material: *draw.material(),
                            instances: Vec::new(),
                        });
                        groups.len() - 1
                    });
                    groups[slot].instances.push(state.transform());
                }
                Action::Move(distance) => state.advance(*distance),
                Action::Rotate(delta) => state.rotate(*delta),
                Action::Save => state.save(),
                Action::Restore => {
                    if !state.restore() {
                        return Err(Error::StackUnderflow { index, symbol });
                    }
                }
                Action::Custom(custom) => custom.call(symbol, &mut state)?,
            }
        }

        if state.depth() > 1 {
            warn!(depth = state.depth(), "unmatched saves discarded");
        }
        debug!(
            depth = state.depth(),
            groups = groups.len(),
            instances = groups.iter().map(|g| g.instances.len()).sum::<usize>(),
            "interpretation complete"
        );
        Ok(groups)
    }

    fn bind(&mut self, symbol: Symbol, action: Action) {
        trace!(%symbol, action = action.kind(), "action defined");
        self.draw_names.remove(&symbol);
        self.actions.insert(symbol, action);
    }

    fn intern_shape(&mut self, draw: DrawAction) -> ShapeId {
        let existing = self
            .shapes
            .iter()
            .position(|s| s.mesh() == draw.mesh() && s.material() == draw.material());
        let index = existing.unwrap_or_else(|| {
            self.shapes.push(draw);
            self.shapes.len() - 1
        });
        ShapeId(index as u32)
    }
}
