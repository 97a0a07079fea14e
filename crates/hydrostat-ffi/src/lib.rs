//! C ABI for the hydrostat shape search.
//!
//! Hosts exchange models as the fixed binary records of
//! [`hydrostat::core::layout`], at the storage precision chosen in
//! [`HydrostatParams`]. Every entry point returns a [`HydrostatStatus`];
//! failures are also logged through `tracing` once a subscriber is installed
//! with [`hydrostat_init_logging`].
//!
//! # Safety
//!
//! - Pointers must be null or valid for the stated lengths for the whole call.
//! - Output buffers must not alias any input buffer.
//! - Panics are caught at the boundary and reported as
//!   [`HydrostatStatus::Internal`].

pub mod error;
pub mod logging;

use error::{FfiError, Result};
use hydrostat::core::layout::{model_size, read_template, template_size, write_models};
use hydrostat::core::models::model::Model;
use hydrostat::core::precision::PrecisionKind;
use hydrostat::engine::config::{ConfigError, Executor, GlobalMode, SearchConfig};
use hydrostat::engine::progress::ProgressReporter;
use hydrostat::workflows::explore;
use std::ffi::{CStr, c_char};
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::slice;
use tracing::{error, info};

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HydrostatStatus {
    Ok = 0,
    NullPointer,
    BufferTooSmall,
    InvalidLayout,
    InvalidConfig,
    AlreadyInitialized,
    Internal,
}

/// Search parameters as passed by the host.
///
/// Precision fields are widths in bits (32 or 64). `global_mode` is 0 for
/// two-stage and 1 for best-effort; `executor` is 0 for serial and 1 for
/// lockstep.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HydrostatParams {
    pub population_size: u64,
    pub seed: u64,
    pub temperature: f64,
    pub error_threshold: f64,
    pub has_error_threshold: bool,
    pub storage_bits: u32,
    pub calculation_bits: u32,
    pub global_mode: u32,
    pub executor: u32,
}

impl Default for HydrostatParams {
    fn default() -> Self {
        Self {
            population_size: 256,
            seed: 0,
            temperature: 0.0,
            error_threshold: 0.0,
            has_error_threshold: false,
            storage_bits: 64,
            calculation_bits: 64,
            global_mode: 0,
            executor: 0,
        }
    }
}

fn precision_from_bits(name: &'static str, bits: u32) -> std::result::Result<PrecisionKind, ConfigError> {
    PrecisionKind::from_bits(bits).ok_or_else(|| ConfigError::InvalidValue {
        name,
        reason: format!("{bits} is not a supported width, expected 32 or 64"),
    })
}

impl HydrostatParams {
    pub fn to_config(&self) -> std::result::Result<SearchConfig, ConfigError> {
        let global_mode = match self.global_mode {
            0 => GlobalMode::TwoStage,
            1 => GlobalMode::BestEffort,
            other => {
                return Err(ConfigError::InvalidValue {
                    name: "global_mode",
                    reason: format!("unknown mode code {other}"),
                });
            }
        };
        let executor = match self.executor {
            0 => Executor::Serial,
            1 => Executor::Lockstep,
            other => {
                return Err(ConfigError::InvalidValue {
                    name: "executor",
                    reason: format!("unknown executor code {other}"),
                });
            }
        };
        let population_size =
            usize::try_from(self.population_size).map_err(|_| ConfigError::InvalidValue {
                name: "population_size",
                reason: format!("{} does not fit in this platform's usize", self.population_size),
            })?;

        let mut builder = SearchConfig::builder()
            .population_size(population_size)
            .seed(self.seed)
            .temperature(self.temperature)
            .precision(
                precision_from_bits("storage_bits", self.storage_bits)?,
                precision_from_bits("calculation_bits", self.calculation_bits)?,
            )
            .global_mode(global_mode)
            .executor(executor)
            .retain_population(true);
        if self.has_error_threshold {
            builder = builder.error_threshold(self.error_threshold);
        }
        builder.build()
    }
}

/// Record sizes in bytes for one storage precision.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HydrostatRecordSizes {
    pub template: usize,
    pub model: usize,
    pub group_size: usize,
}

/// Indices reported alongside the written records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExploreSummary {
    pub best_index: usize,
    pub best_score: f64,
    pub num_groups: usize,
}

/// Bytes needed for `count` model records, or a configuration error naming
/// the parameter whose value makes the total overflow.
fn records_bytes(record: usize, count: usize, parameter: &'static str) -> Result<usize> {
    record.checked_mul(count).ok_or_else(|| {
        FfiError::Config(ConfigError::InvalidValue {
            name: parameter,
            reason: format!("{count} records of {record} bytes overflow the address space"),
        })
    })
}

fn check_capacity(name: &'static str, expected: usize, found: usize) -> Result<()> {
    if found < expected {
        return Err(FfiError::BufferTooSmall {
            name,
            expected,
            found,
        });
    }
    Ok(())
}

/// Runs one exploration over byte buffers. `models_out` receives the whole
/// population in worker order and `groups_out` the winner of each group in
/// group order, both as model records at the storage precision.
pub fn explore_into(
    template: &[u8],
    models_out: &mut [u8],
    groups_out: &mut [u8],
    params: &HydrostatParams,
) -> Result<ExploreSummary> {
    let config = params.to_config()?;
    let storage = config.precision.storage;
    let record = model_size(storage);
    let population_bytes = records_bytes(record, config.population_size, "population_size")?;
    let group_bytes = records_bytes(record, config.num_groups(), "population_size")?;
    check_capacity("models_out", population_bytes, models_out.len())?;
    check_capacity("groups_out", group_bytes, groups_out.len())?;

    let template = read_template(storage, template)?;
    let result = explore::run(&template, &config, &ProgressReporter::new())?;

    write_models(storage, &result.population, models_out)?;
    let winners: Vec<Model> = result
        .group_bests
        .iter()
        .map(|group| group.model.clone())
        .collect();
    write_models(storage, &winners, groups_out)?;

    Ok(ExploreSummary {
        best_index: result.global_best.index,
        best_score: result.global_best.score,
        num_groups: winners.len(),
    })
}

fn guarded<T>(name: &'static str, body: impl FnOnce() -> Result<T>) -> std::result::Result<T, HydrostatStatus> {
    match panic::catch_unwind(AssertUnwindSafe(body)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => {
            error!(call = name, error = %e, "Call failed.");
            Err(e.status())
        }
        Err(_) => {
            error!(call = name, "Call panicked.");
            Err(HydrostatStatus::Internal)
        }
    }
}

/// Fills `models_out` with the scored population and `groups_out` with the
/// group winners. When `best_index_out` is not null, the population index of
/// the global best is stored there.
///
/// # Safety
///
/// `template`, `models_out`, `groups_out` and `params` must be valid for the
/// given lengths; `best_index_out` must be null or valid for one write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hydrostat_explore(
    template: *const u8,
    template_len: usize,
    models_out: *mut u8,
    models_out_len: usize,
    groups_out: *mut u8,
    groups_out_len: usize,
    params: *const HydrostatParams,
    best_index_out: *mut u64,
) -> HydrostatStatus {
    let missing = [
        ("template", template.is_null()),
        ("models_out", models_out.is_null()),
        ("groups_out", groups_out.is_null()),
        ("params", params.is_null()),
    ]
    .into_iter()
    .find(|(_, null)| *null);
    if let Some((name, _)) = missing {
        let e = FfiError::NullPointer(name);
        error!(call = "hydrostat_explore", error = %e, "Call failed.");
        return e.status();
    }

    // SAFETY: non-null, and valid for the stated lengths per the contract above.
    let (template, models_out, groups_out, params) = unsafe {
        (
            slice::from_raw_parts(template, template_len),
            slice::from_raw_parts_mut(models_out, models_out_len),
            slice::from_raw_parts_mut(groups_out, groups_out_len),
            &*params,
        )
    };

    match guarded("hydrostat_explore", || {
        explore_into(template, models_out, groups_out, params)
    }) {
        Ok(summary) => {
            if !best_index_out.is_null() {
                // SAFETY: checked non-null; valid for one write per the contract.
                unsafe { *best_index_out = summary.best_index as u64 };
            }
            HydrostatStatus::Ok
        }
        Err(status) => status,
    }
}

/// Writes the record sizes for `storage_bits` (32 or 64) into `sizes`.
///
/// # Safety
///
/// `sizes` must be null or valid for one write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hydrostat_record_sizes(
    storage_bits: u32,
    sizes: *mut HydrostatRecordSizes,
) -> HydrostatStatus {
    if sizes.is_null() {
        return HydrostatStatus::NullPointer;
    }
    let Some(kind) = PrecisionKind::from_bits(storage_bits) else {
        return HydrostatStatus::InvalidConfig;
    };
    // SAFETY: checked non-null; valid for one write per the contract.
    unsafe {
        *sizes = HydrostatRecordSizes {
            template: template_size(kind),
            model: model_size(kind),
            group_size: hydrostat::engine::reduction::GROUP_SIZE,
        };
    }
    HydrostatStatus::Ok
}

/// Installs the logging subscriber. `verbosity` 0 logs warnings, 1 info,
/// 2 debug and 3 or more trace. `log_path` may be null; otherwise it is a
/// UTF-8 path that also receives the log.
///
/// # Safety
///
/// `log_path` must be null or a valid NUL-terminated string.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn hydrostat_init_logging(
    verbosity: u8,
    log_path: *const c_char,
) -> HydrostatStatus {
    let path = if log_path.is_null() {
        None
    } else {
        // SAFETY: non-null and NUL-terminated per the contract.
        match unsafe { CStr::from_ptr(log_path) }.to_str() {
            Ok(path) => Some(PathBuf::from(path)),
            Err(_) => return HydrostatStatus::InvalidConfig,
        }
    };
    match guarded("hydrostat_init_logging", || logging::setup_logging(verbosity, path)) {
        Ok(()) => {
            info!(version = env!("CARGO_PKG_VERSION"), "hydrostat logging initialized.");
            HydrostatStatus::Ok
        }
        Err(status) => status,
    }
}

/// Sizes the global rayon pool. Has to run before the first search, since
/// the pool is fixed once built.
#[unsafe(no_mangle)]
pub extern "C" fn hydrostat_set_threads(num_threads: usize) -> HydrostatStatus {
    match guarded("hydrostat_set_threads", || {
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|_| FfiError::AlreadyInitialized("thread pool"))
    }) {
        Ok(()) => {
            info!(threads = num_threads, "Set rayon global thread pool size.");
            HydrostatStatus::Ok
        }
        Err(status) => status,
    }
}
