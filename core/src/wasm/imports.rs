//! Host functions exposed to the game module under `env`
//!
//! The module decides the numeric types of every parameter, so imports are
//! registered with [`Linker::func_new`] using the type the module declares
//! and values are coerced on entry.

use wasmtime::{Caller, ExternType, Linker, Module, Val};

use super::context::BridgeContext;
use super::error::ModuleLoadFailure;
use super::memory::MemoryView;
use super::values::{address, check_numeric, number};
use crate::render::{Canvas2d, Rgb};

/// Import module namespace
pub const IMPORT_MODULE: &str = "env";

/// Every function the host can provide
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostImport {
    ConsoleLog,
    ClearCanvas,
    DrawRect,
    DrawCircle,
    DrawLine,
    DrawTriangle,
    DrawText,
    PlayEnemyHitSound,
    PlayLevelCompleteSound,
    PlayLevelFailSound,
    PlayTowerShootSound,
    PlayEnemyExplosionSound,
}

impl HostImport {
    pub const ALL: [HostImport; 12] = [
        HostImport::ConsoleLog,
        HostImport::ClearCanvas,
        HostImport::DrawRect,
        HostImport::DrawCircle,
        HostImport::DrawLine,
        HostImport::DrawTriangle,
        HostImport::DrawText,
        HostImport::PlayEnemyHitSound,
        HostImport::PlayLevelCompleteSound,
        HostImport::PlayLevelFailSound,
        HostImport::PlayTowerShootSound,
        HostImport::PlayEnemyExplosionSound,
    ];

    /// Name the module imports this function by
    pub fn name(self) -> &'static str {
        match self {
            HostImport::ConsoleLog => "consoleLog",
            HostImport::ClearCanvas => "clearCanvas",
            HostImport::DrawRect => "drawRect",
            HostImport::DrawCircle => "drawCircle",
            HostImport::DrawLine => "drawLine",
            HostImport::DrawTriangle => "drawTriangle",
            HostImport::DrawText => "drawText",
            HostImport::PlayEnemyHitSound => "playEnemyHitSound",
            HostImport::PlayLevelCompleteSound => "playLevelCompleteSound",
            HostImport::PlayLevelFailSound => "playLevelFailSound",
            HostImport::PlayTowerShootSound => "playTowerShootSound",
            HostImport::PlayEnemyExplosionSound => "playEnemyExplosionSound",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|import| import.name() == name)
    }

    /// Number of parameters the host reads
    pub fn arity(self) -> usize {
        match self {
            HostImport::ConsoleLog => 2,
            HostImport::ClearCanvas => 0,
            HostImport::DrawRect => 7,
            HostImport::DrawCircle => 7,
            HostImport::DrawLine => 8,
            HostImport::DrawTriangle => 10,
            HostImport::DrawText => 8,
            _ => 0,
        }
    }

    /// Audio cue triggered by a `play*` import
    pub fn cue(self) -> Option<&'static str> {
        match self {
            HostImport::PlayEnemyHitSound => Some("enemyHit"),
            HostImport::PlayLevelCompleteSound => Some("levelComplete"),
            HostImport::PlayLevelFailSound => Some("levelFail"),
            HostImport::PlayTowerShootSound => Some("towerShoot"),
            HostImport::PlayEnemyExplosionSound => Some("enemyExplosion"),
            _ => None,
        }
    }
}

/// Register a host function for every `env` import the module declares
///
/// Only imports the module actually uses are defined. Unknown names and
/// signatures the host cannot serve are rejected before instantiation.
pub fn link_imports<C: Canvas2d + 'static>(
    linker: &mut Linker<BridgeContext<C>>,
    module: &Module,
) -> Result<(), ModuleLoadFailure> {
    for import in module.imports() {
        if import.module() != IMPORT_MODULE {
            return Err(ModuleLoadFailure::Link(format!(
                "unknown import module `{}` (for `{}`)",
                import.module(),
                import.name()
            )));
        }

        let name = import.name();
        let Some(host) = HostImport::from_name(name) else {
            return Err(ModuleLoadFailure::Link(format!(
                "unknown import `{IMPORT_MODULE}.{name}`"
            )));
        };
        let ExternType::Func(ty) = import.ty() else {
            return Err(ModuleLoadFailure::ImportSignature {
                name: name.to_string(),
                reason: "expected a function".to_string(),
            });
        };

        let signature_error = |reason: String| ModuleLoadFailure::ImportSignature {
            name: name.to_string(),
            reason,
        };
        if ty.params().len() != host.arity() {
            return Err(signature_error(format!(
                "expected {} parameters, found {}",
                host.arity(),
                ty.params().len()
            )));
        }
        if ty.results().len() != 0 {
            return Err(signature_error("host imports return no values".to_string()));
        }
        check_numeric(&ty).map_err(signature_error)?;

        linker
            .func_new(IMPORT_MODULE, name, ty, move |caller, params, _results| {
                dispatch(host, caller, params);
                Ok(())
            })
            .map_err(|e| ModuleLoadFailure::Link(format!("{e:#}")))?;
    }
    Ok(())
}

fn dispatch<C: Canvas2d + 'static>(
    import: HostImport,
    mut caller: Caller<'_, BridgeContext<C>>,
    params: &[Val],
) {
    let n = |i: usize| number(&params[i]) as f32;
    let flag = |i: usize| {
        let v = number(&params[i]);
        v != 0.0 && !v.is_nan()
    };
    let rgb = |i: usize| {
        Rgb::from_numbers(number(&params[i]), number(&params[i + 1]), number(&params[i + 2]))
    };

    match import {
        HostImport::ConsoleLog => {
            let read = MemoryView::resolve(&mut caller)
                .read_utf8(address(&params[0]), address(&params[1]));
            match read {
                Ok(message) => caller.data_mut().log_message(&message),
                Err(e) => tracing::warn!("consoleLog ignored: {}", e),
            }
        }
        HostImport::ClearCanvas => caller.data_mut().render.clear(),
        HostImport::DrawRect => {
            caller
                .data_mut()
                .render
                .draw_rect(n(0), n(1), n(2), n(3), rgb(4));
        }
        HostImport::DrawCircle => {
            caller
                .data_mut()
                .render
                .draw_circle(n(0), n(1), n(2), rgb(3), flag(6));
        }
        HostImport::DrawLine => {
            caller.data_mut().render.draw_line(
                glam::Vec2::new(n(0), n(1)),
                glam::Vec2::new(n(2), n(3)),
                n(4),
                rgb(5),
            );
        }
        HostImport::DrawTriangle => {
            let points = [
                glam::Vec2::new(n(0), n(1)),
                glam::Vec2::new(n(2), n(3)),
                glam::Vec2::new(n(4), n(5)),
            ];
            caller
                .data_mut()
                .render
                .draw_triangle(points, rgb(6), flag(9));
        }
        HostImport::DrawText => {
            let text = MemoryView::resolve(&mut caller)
                .read_utf8_or_empty(address(&params[2]), address(&params[3]));
            caller
                .data_mut()
                .render
                .draw_text(n(0), n(1), &text, n(4), rgb(5));
        }
        HostImport::PlayEnemyHitSound
        | HostImport::PlayLevelCompleteSound
        | HostImport::PlayLevelFailSound
        | HostImport::PlayTowerShootSound
        | HostImport::PlayEnemyExplosionSound => {
            if let Some(cue) = import.cue() {
                caller.data_mut().audio.trigger(cue);
            }
        }
    }
}
