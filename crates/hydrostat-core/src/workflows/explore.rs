use crate::core::layout::round_to_storage;
use crate::core::models::model::{Model, SENTINEL};
use crate::core::precision::{Precision, PrecisionKind};
use crate::engine::config::{GlobalMode, SearchConfig};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::ranking::top_k;
use crate::engine::reduction::{GROUP_SIZE, SharedBest, reduce_group, reduce_two_stage};
use crate::engine::scoring::{Objective, Scorer};
use crate::engine::variation::VariationGenerator;
use tracing::{debug, info, instrument, trace, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Winner of one group of [`GROUP_SIZE`] consecutive candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkgroupBest {
    pub group: usize,
    /// Population index of the winning candidate.
    pub index: usize,
    pub score: f64,
    pub model: Model,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlobalBest {
    pub index: usize,
    pub score: f64,
    pub model: Model,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedModel {
    pub index: usize,
    pub score: f64,
    pub model: Model,
}

#[derive(Debug, Clone)]
pub struct ExploreResult {
    /// The template as held in storage precision, scored for reference.
    pub template: Model,
    /// Every candidate in worker order; empty unless the population is retained.
    pub population: Vec<Model>,
    pub group_bests: Vec<WorkgroupBest>,
    pub global_best: GlobalBest,
    /// The lowest-scoring candidates in ascending order.
    pub top: Vec<RankedModel>,
}

#[instrument(skip_all, name = "explore_workflow", fields(population = config.population_size, seed = config.seed))]
pub fn run(
    template: &Model,
    config: &SearchConfig,
    reporter: &ProgressReporter,
) -> Result<ExploreResult, EngineError> {
    info!(
        layers = template.num_layers(),
        temperature = config.temperature,
        storage = %config.precision.storage,
        calculation = %config.precision.calculation,
        "Starting exploration."
    );
    match config.precision.calculation {
        PrecisionKind::Single => explore::<f32>(template, config, reporter),
        PrecisionKind::Double => explore::<f64>(template, config, reporter),
    }
}

fn explore<T: Precision>(
    template: &Model,
    config: &SearchConfig,
    reporter: &ProgressReporter,
) -> Result<ExploreResult, EngineError> {
    let storage = config.precision.storage;
    let scorer = Scorer::<T>::new(Objective::from_threshold(config.error_threshold));

    let mut stored_template = round_to_storage(template, storage);
    scorer.score(&mut stored_template);
    let stored_template = round_to_storage(&stored_template, storage);
    if stored_template.num_layers() == 0 {
        warn!("Template has no layers; every candidate will be penalized.");
    }

    let population = reporter.phase("Generation & Scoring", || {
        generate_and_score(&stored_template, &scorer, config)
    });
    let group_bests = reporter.phase("Group Reduction", || {
        reduce_groups(&population, config, reporter)
    })?;
    let global_best = reporter.phase("Global Reduction", || {
        reduce_global(&population, &group_bests, config)
    })?;

    let scores: Vec<f64> = population.iter().map(Model::score).collect();
    let top = top_k(&scores, config.top_k)
        .into_iter()
        .map(|ranked| RankedModel {
            index: ranked.index,
            score: ranked.score,
            model: population[ranked.index].clone(),
        })
        .collect();

    info!(
        index = global_best.index,
        score = global_best.score,
        template_score = stored_template.score(),
        groups = group_bests.len(),
        "Exploration finished."
    );

    Ok(ExploreResult {
        template: stored_template,
        population: if config.retain_population {
            population
        } else {
            Vec::new()
        },
        group_bests,
        global_best,
        top,
    })
}

fn generate_and_score<T: Precision>(
    template: &Model,
    scorer: &Scorer<T>,
    config: &SearchConfig,
) -> Vec<Model> {
    let storage = config.precision.storage;
    let generator = VariationGenerator::<T>::new(template, config.temperature, storage);

    #[cfg(not(feature = "parallel"))]
    let workers = 0..config.population_size;

    #[cfg(feature = "parallel")]
    let workers = (0..config.population_size).into_par_iter();

    let population: Vec<Model> = workers
        .map(|worker| {
            let mut candidate = generator.generate(config.seed, worker);
            scorer.score(&mut candidate);
            trace!(worker, score = candidate.score(), "Scored candidate.");
            round_to_storage(&candidate, storage)
        })
        .collect();

    debug!(candidates = population.len(), "Population generated and scored.");
    population
}

fn reduce_groups(
    population: &[Model],
    config: &SearchConfig,
    reporter: &ProgressReporter,
) -> Result<Vec<WorkgroupBest>, EngineError> {
    reporter.report(Progress::TaskStart {
        total_steps: config.num_groups() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let groups = population.chunks(GROUP_SIZE).enumerate();

    #[cfg(feature = "parallel")]
    let groups = population.par_chunks(GROUP_SIZE).enumerate();

    let group_bests: Vec<WorkgroupBest> = groups
        .map(|(group, members)| {
            let scores: Vec<f64> = members.iter().map(Model::score).collect();
            let best = reduce_group(config.executor, &scores);
            let index = group * GROUP_SIZE + best.lane;
            if best.score >= SENTINEL {
                warn!(group, "Every candidate in the group was penalized.");
            } else {
                debug!(group, index, score = best.score, "Group reduced.");
            }
            reporter.report(Progress::GroupWinner {
                group,
                index,
                score: best.score,
            });
            reporter.report(Progress::TaskIncrement);
            WorkgroupBest {
                group,
                index,
                score: best.score,
                model: members[best.lane].clone(),
            }
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    if group_bests.len() != config.num_groups() {
        return Err(EngineError::PhaseFailed {
            phase: "Group Reduction",
            reason: format!(
                "expected {} group winners, got {}",
                config.num_groups(),
                group_bests.len()
            ),
        });
    }
    Ok(group_bests)
}

fn reduce_global(
    population: &[Model],
    group_bests: &[WorkgroupBest],
    config: &SearchConfig,
) -> Result<GlobalBest, EngineError> {
    let global_best = match config.global_mode {
        GlobalMode::TwoStage => {
            let scores: Vec<f64> = group_bests.iter().map(|group| group.score).collect();
            let (winner, score) =
                reduce_two_stage(config.executor, &scores).ok_or(EngineError::EmptyPopulation)?;
            let group = &group_bests[winner];
            GlobalBest {
                index: group.index,
                score,
                model: group.model.clone(),
            }
        }
        GlobalMode::BestEffort => {
            let shared = SharedBest::new();

            #[cfg(not(feature = "parallel"))]
            let candidates = population.iter();

            #[cfg(feature = "parallel")]
            let candidates = population.par_iter();

            candidates
                .enumerate()
                .for_each(|(index, candidate)| shared.offer(index, candidate.score()));

            let (index, score) = shared.load();
            let model = population
                .get(index)
                .cloned()
                .ok_or(EngineError::EmptyPopulation)?;
            GlobalBest { index, score, model }
        }
    };

    debug!(
        index = global_best.index,
        score = global_best.score,
        mode = ?config.global_mode,
        "Global best selected."
    );
    Ok(global_best)
}
