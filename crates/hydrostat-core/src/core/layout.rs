//! Fixed binary layouts shared with the host.
//!
//! Every real is stored at the storage precision. A record is a header
//! (angular momentum, layer count, padding), then twenty layer slots of five
//! reals (`a, b, c, r, density`), then, for model records only, the seven
//! derived reals, the sentinel constant and the score. The records are
//! `#[repr(C)]` and contain no implicit padding, so they are read and written
//! by plain byte copies.
//!
//! | storage | layer | template | model | layers at | derived at |
//! |---------|-------|----------|-------|-----------|------------|
//! | double  | 40    | 816      | 888   | 16        | 816        |
//! | single  | 20    | 416      | 452   | 16        | 416        |

use super::models::model::{Evaluation, Model, SENTINEL};
use super::models::stack::{CAPACITY, ShellStack};
use super::precision::PrecisionKind;
use bytemuck::Pod;
use std::mem::{offset_of, size_of};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("Record declares {found} layers, but at most {capacity} fit")]
    LayerCountOutOfRange { found: u32, capacity: usize },

    #[error("Buffer holds {found} bytes, but {expected} are required")]
    BufferSize { expected: usize, found: usize },
}

/// Conversion between models and the records of one storage precision.
pub trait StorageRecords {
    const KIND: PrecisionKind;
    type Template: Pod;
    type Model: Pod;

    fn encode_template(model: &Model) -> Self::Template;
    fn decode_template(record: &Self::Template) -> Result<Model, LayoutError>;
    fn encode_model(model: &Model) -> Self::Model;
    fn decode_model(record: &Self::Model) -> Result<Model, LayoutError>;
}

macro_rules! storage_records {
    ($module:ident, $storage:ident, $kind:expr, $real:ty, $pad:literal) => {
        pub mod $module {
            use super::CAPACITY;
            use bytemuck::{Pod, Zeroable};

            #[repr(C)]
            #[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
            pub struct ShellRecord {
                pub a: $real,
                pub b: $real,
                pub c: $real,
                pub r: $real,
                pub density: $real,
            }

            #[repr(C)]
            #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
            pub struct TemplateRecord {
                pub angular_momentum: $real,
                pub num_layers: u32,
                pub _pad: [u32; $pad],
                pub layers: [ShellRecord; CAPACITY],
            }

            #[repr(C)]
            #[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
            pub struct ModelRecord {
                pub angular_momentum: $real,
                pub num_layers: u32,
                pub _pad: [u32; $pad],
                pub layers: [ShellRecord; CAPACITY],
                pub rel_equipotential_err: $real,
                pub total_energy: $real,
                pub angular_velocity: $real,
                pub moment_of_inertia: $real,
                pub potential_energy: $real,
                pub kinetic_energy: $real,
                pub virial_ratio: $real,
                pub sentinel: $real,
                pub score: $real,
            }
        }

        pub struct $storage;

        impl $storage {
            fn encode_layers(model: &Model) -> [$module::ShellRecord; CAPACITY] {
                let mut layers = [$module::ShellRecord::default(); CAPACITY];
                for (slot, shell) in layers.iter_mut().zip(model.layers()) {
                    *slot = $module::ShellRecord {
                        a: shell.a as $real,
                        b: shell.b as $real,
                        c: shell.c as $real,
                        r: shell.r as $real,
                        density: shell.density as $real,
                    };
                }
                layers
            }

            fn decode_layers(
                num_layers: u32,
                records: &[$module::ShellRecord; CAPACITY],
            ) -> Result<ShellStack, LayoutError> {
                let len = num_layers as usize;
                if len > CAPACITY {
                    return Err(LayoutError::LayerCountOutOfRange {
                        found: num_layers,
                        capacity: CAPACITY,
                    });
                }
                let mut stack = ShellStack::new();
                for record in &records[..len] {
                    let shell = crate::core::models::shell::Shell {
                        a: record.a as f64,
                        b: record.b as f64,
                        c: record.c as f64,
                        r: record.r as f64,
                        density: record.density as f64,
                    };
                    stack
                        .push(shell)
                        .map_err(|_| LayoutError::LayerCountOutOfRange {
                            found: num_layers,
                            capacity: CAPACITY,
                        })?;
                }
                Ok(stack)
            }
        }

        impl StorageRecords for $storage {
            const KIND: PrecisionKind = $kind;
            type Template = $module::TemplateRecord;
            type Model = $module::ModelRecord;

            fn encode_template(model: &Model) -> Self::Template {
                $module::TemplateRecord {
                    angular_momentum: model.angular_momentum as $real,
                    num_layers: model.num_layers() as u32,
                    _pad: [0; $pad],
                    layers: Self::encode_layers(model),
                }
            }

            fn decode_template(record: &Self::Template) -> Result<Model, LayoutError> {
                let layers = Self::decode_layers(record.num_layers, &record.layers)?;
                Ok(Model::from_parts(
                    record.angular_momentum as f64,
                    layers,
                    Evaluation::default(),
                ))
            }

            fn encode_model(model: &Model) -> Self::Model {
                let evaluation = &model.evaluation;
                $module::ModelRecord {
                    angular_momentum: model.angular_momentum as $real,
                    num_layers: model.num_layers() as u32,
                    _pad: [0; $pad],
                    layers: Self::encode_layers(model),
                    rel_equipotential_err: evaluation.rel_equipotential_err as $real,
                    total_energy: evaluation.total_energy as $real,
                    angular_velocity: evaluation.angular_velocity as $real,
                    moment_of_inertia: evaluation.moment_of_inertia as $real,
                    potential_energy: evaluation.potential_energy as $real,
                    kinetic_energy: evaluation.kinetic_energy as $real,
                    virial_ratio: evaluation.virial_ratio as $real,
                    sentinel: SENTINEL as $real,
                    score: evaluation.score as $real,
                }
            }

            fn decode_model(record: &Self::Model) -> Result<Model, LayoutError> {
                let layers = Self::decode_layers(record.num_layers, &record.layers)?;
                let evaluation = Evaluation {
                    rel_equipotential_err: record.rel_equipotential_err as f64,
                    total_energy: record.total_energy as f64,
                    angular_velocity: record.angular_velocity as f64,
                    moment_of_inertia: record.moment_of_inertia as f64,
                    potential_energy: record.potential_energy as f64,
                    kinetic_energy: record.kinetic_energy as f64,
                    virial_ratio: record.virial_ratio as f64,
                    score: record.score as f64,
                };
                Ok(Model::from_parts(record.angular_momentum as f64, layers, evaluation))
            }
        }
    };
}

storage_records!(double, DoubleStorage, PrecisionKind::Double, f64, 1);
storage_records!(single, SingleStorage, PrecisionKind::Single, f32, 2);

const _: () = {
    assert!(size_of::<double::ShellRecord>() == 40);
    assert!(size_of::<double::TemplateRecord>() == 816);
    assert!(size_of::<double::ModelRecord>() == 888);
    assert!(offset_of!(double::ModelRecord, layers) == 16);
    assert!(offset_of!(double::ModelRecord, rel_equipotential_err) == 816);
    assert!(size_of::<single::ShellRecord>() == 20);
    assert!(size_of::<single::TemplateRecord>() == 416);
    assert!(size_of::<single::ModelRecord>() == 452);
    assert!(offset_of!(single::ModelRecord, layers) == 16);
    assert!(offset_of!(single::ModelRecord, rel_equipotential_err) == 416);
};

pub const fn template_size(kind: PrecisionKind) -> usize {
    match kind {
        PrecisionKind::Single => size_of::<single::TemplateRecord>(),
        PrecisionKind::Double => size_of::<double::TemplateRecord>(),
    }
}

pub const fn model_size(kind: PrecisionKind) -> usize {
    match kind {
        PrecisionKind::Single => size_of::<single::ModelRecord>(),
        PrecisionKind::Double => size_of::<double::ModelRecord>(),
    }
}

/// Bytes taken by `count` records of `size` bytes. A total past `usize::MAX`
/// can never fit, so it reports as a buffer of `found` bytes being too short.
fn records_len(size: usize, count: usize, found: usize) -> Result<usize, LayoutError> {
    size.checked_mul(count).ok_or(LayoutError::BufferSize {
        expected: usize::MAX,
        found,
    })
}

fn check_len(expected: usize, found: usize) -> Result<(), LayoutError> {
    if found < expected {
        return Err(LayoutError::BufferSize { expected, found });
    }
    Ok(())
}

fn read_record<R: Pod>(bytes: &[u8]) -> Result<R, LayoutError> {
    let expected = size_of::<R>();
    check_len(expected, bytes.len())?;
    bytemuck::try_pod_read_unaligned(&bytes[..expected]).map_err(|_| LayoutError::BufferSize {
        expected,
        found: bytes.len(),
    })
}

fn write_record<R: Pod>(record: &R, out: &mut [u8]) -> Result<usize, LayoutError> {
    let bytes = bytemuck::bytes_of(record);
    check_len(bytes.len(), out.len())?;
    out[..bytes.len()].copy_from_slice(bytes);
    Ok(bytes.len())
}

fn read_template_as<S: StorageRecords>(bytes: &[u8]) -> Result<Model, LayoutError> {
    S::decode_template(&read_record::<S::Template>(bytes)?)
}

fn read_models_as<S: StorageRecords>(bytes: &[u8]) -> Result<Vec<Model>, LayoutError> {
    let size = size_of::<S::Model>();
    bytes
        .chunks_exact(size)
        .map(|chunk| S::decode_model(&read_record::<S::Model>(chunk)?))
        .collect()
}

fn write_models_as<S: StorageRecords>(models: &[Model], out: &mut [u8]) -> Result<usize, LayoutError> {
    let size = size_of::<S::Model>();
    let total = records_len(size, models.len(), out.len())?;
    check_len(total, out.len())?;
    for (model, chunk) in models.iter().zip(out.chunks_exact_mut(size)) {
        write_record(&S::encode_model(model), chunk)?;
    }
    Ok(total)
}

/// Reads a template record from the start of `bytes`.
pub fn read_template(kind: PrecisionKind, bytes: &[u8]) -> Result<Model, LayoutError> {
    match kind {
        PrecisionKind::Single => read_template_as::<SingleStorage>(bytes),
        PrecisionKind::Double => read_template_as::<DoubleStorage>(bytes),
    }
}

/// Writes `model` as a template record and returns the bytes written.
pub fn write_template(kind: PrecisionKind, model: &Model, out: &mut [u8]) -> Result<usize, LayoutError> {
    match kind {
        PrecisionKind::Single => write_record(&SingleStorage::encode_template(model), out),
        PrecisionKind::Double => write_record(&DoubleStorage::encode_template(model), out),
    }
}

/// Reads every whole model record in `bytes`. Trailing bytes short of a full
/// record are ignored.
pub fn read_models(kind: PrecisionKind, bytes: &[u8]) -> Result<Vec<Model>, LayoutError> {
    match kind {
        PrecisionKind::Single => read_models_as::<SingleStorage>(bytes),
        PrecisionKind::Double => read_models_as::<DoubleStorage>(bytes),
    }
}

/// Writes `models` back to back and returns the bytes written.
pub fn write_models(kind: PrecisionKind, models: &[Model], out: &mut [u8]) -> Result<usize, LayoutError> {
    match kind {
        PrecisionKind::Single => write_models_as::<SingleStorage>(models, out),
        PrecisionKind::Double => write_models_as::<DoubleStorage>(models, out),
    }
}

/// Rounds every stored real of `model` to what a record of `kind` holds.
pub fn round_to_storage(model: &Model, kind: PrecisionKind) -> Model {
    let mut rounded = model.clone();
    rounded.angular_momentum = kind.round(rounded.angular_momentum);
    for shell in rounded.layers_mut() {
        shell.a = kind.round(shell.a);
        shell.b = kind.round(shell.b);
        shell.c = kind.round(shell.c);
        shell.r = kind.round(shell.r);
        shell.density = kind.round(shell.density);
    }
    let evaluation = &mut rounded.evaluation;
    for value in [
        &mut evaluation.rel_equipotential_err,
        &mut evaluation.total_energy,
        &mut evaluation.angular_velocity,
        &mut evaluation.moment_of_inertia,
        &mut evaluation.potential_energy,
        &mut evaluation.kinetic_energy,
        &mut evaluation.virial_ratio,
        &mut evaluation.score,
    ] {
        *value = kind.round(*value);
    }
    rounded
}
