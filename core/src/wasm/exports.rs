//! The module's export surface, resolved once after instantiation

use wasmtime::{Func, Instance, Store, Val};

use super::error::ModuleLoadFailure;
use super::values::{check_numeric, number, to_val, zero};

/// Which optional exports the module provides
///
/// Resolved once at instantiation; callers never probe the instance again.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ModuleCapabilities {
    /// `setScale(sx, sy)` is exported
    pub set_scale: bool,
    /// `resetGame()` is exported
    pub reset_game: bool,
}

/// Shape an export must have to be callable by the host
struct ExportShape {
    name: &'static str,
    params: usize,
    returns_value: bool,
}

const INIT: ExportShape = ExportShape { name: "init", params: 2, returns_value: false };
const UPDATE: ExportShape = ExportShape { name: "update", params: 1, returns_value: false };
const HANDLE_CLICK: ExportShape = ExportShape { name: "handleClick", params: 2, returns_value: false };
const SELECT_TOWER_TYPE: ExportShape = ExportShape { name: "selectTowerType", params: 1, returns_value: false };
const CAN_PLACE_TOWER: ExportShape = ExportShape { name: "canPlaceTower", params: 2, returns_value: true };
const GET_TOWER_RANGE: ExportShape = ExportShape { name: "getTowerRange", params: 0, returns_value: true };
const SET_SCALE: ExportShape = ExportShape { name: "setScale", params: 2, returns_value: false };
const RESET_GAME: ExportShape = ExportShape { name: "resetGame", params: 0, returns_value: false };

/// Typed handles to every export the host calls
#[derive(Debug, Clone, Copy)]
pub struct ModuleExports {
    pub init: Func,
    pub update: Func,
    pub handle_click: Func,
    pub select_tower_type: Func,
    pub can_place_tower: Func,
    pub get_tower_range: Func,
    pub set_scale: Option<Func>,
    pub reset_game: Option<Func>,
}

impl ModuleExports {
    /// Look up and validate the export surface of a fresh instance
    pub fn resolve<T: 'static>(
        store: &mut Store<T>,
        instance: &Instance,
    ) -> Result<Self, ModuleLoadFailure> {
        Ok(Self {
            init: required(store, instance, &INIT)?,
            update: required(store, instance, &UPDATE)?,
            handle_click: required(store, instance, &HANDLE_CLICK)?,
            select_tower_type: required(store, instance, &SELECT_TOWER_TYPE)?,
            can_place_tower: required(store, instance, &CAN_PLACE_TOWER)?,
            get_tower_range: required(store, instance, &GET_TOWER_RANGE)?,
            set_scale: optional(store, instance, &SET_SCALE)?,
            reset_game: optional(store, instance, &RESET_GAME)?,
        })
    }

    pub fn capabilities(&self) -> ModuleCapabilities {
        ModuleCapabilities {
            set_scale: self.set_scale.is_some(),
            reset_game: self.reset_game.is_some(),
        }
    }
}

fn required<T: 'static>(
    store: &mut Store<T>,
    instance: &Instance,
    shape: &ExportShape,
) -> Result<Func, ModuleLoadFailure> {
    optional(store, instance, shape)?.ok_or(ModuleLoadFailure::MissingExport(shape.name))
}

fn optional<T: 'static>(
    store: &mut Store<T>,
    instance: &Instance,
    shape: &ExportShape,
) -> Result<Option<Func>, ModuleLoadFailure> {
    let Some(func) = instance.get_func(&mut *store, shape.name) else {
        return Ok(None);
    };

    let ty = func.ty(&*store);
    let mismatch = |reason: String| ModuleLoadFailure::ExportSignature {
        name: shape.name,
        reason,
    };
    if ty.params().len() != shape.params {
        return Err(mismatch(format!(
            "expected {} parameters, found {}",
            shape.params,
            ty.params().len()
        )));
    }
    if shape.returns_value && ty.results().len() == 0 {
        return Err(mismatch("expected a return value".to_string()));
    }
    check_numeric(&ty).map_err(mismatch)?;

    Ok(Some(func))
}

/// Call an export with numeric arguments, coercing to its declared types
///
/// Returns the first result as a number, if the export has one.
pub fn call_numeric<T: 'static>(
    store: &mut Store<T>,
    func: &Func,
    args: &[f64],
) -> wasmtime::Result<Option<f64>> {
    let ty = func.ty(&*store);
    let params: Vec<Val> = ty
        .params()
        .zip(args.iter().copied())
        .map(|(ty, arg)| to_val(&ty, arg).unwrap_or_else(|| zero(&ty)))
        .collect();
    let mut results: Vec<Val> = ty.results().map(|ty| zero(&ty)).collect();

    func.call(&mut *store, &params, &mut results)?;

    Ok(results.first().map(number))
}
