//! Step-driven placement state machine.
//!
//! Each call to [`AnnealingController::advance`] runs to completion: the first
//! places every cell at random, the second calibrates the starting temperature
//! from a random walk, and every later call performs one Metropolis step
//! followed by a cooling update. Stopping is left to the caller.

use super::acceptance;
use super::schedule::CoolingSchedule;
use super::stats;
use crate::cost;
use crate::moves::MoveGenerator;
use sa_common::db::core::Circuit;
use sa_common::db::grid::Grid;
use sa_common::error::{PlaceError, Result};
use sa_common::util::config::AnnealingConfig;
use std::fmt::{self, Write};
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlacementPhase {
    Idle,
    Initializing,
    Iterating,
}

impl fmt::Display for PlacementPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Initializing => "initializing",
            Self::Iterating => "iterating",
        };
        f.write_str(name)
    }
}

impl FromStr for PlacementPhase {
    type Err = PlaceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "idle" => Ok(Self::Idle),
            "initializing" => Ok(Self::Initializing),
            "iterating" => Ok(Self::Iterating),
            _ => Err(PlaceError::UnknownState(s.to_string())),
        }
    }
}

pub struct AnnealParams {
    pub warmup_samples: usize,
    pub temperature_scale: f64,
    pub cooling: CoolingSchedule,
    pub seed: Option<u64>,
}

impl AnnealParams {
    pub fn from_config(config: &AnnealingConfig) -> Result<Self> {
        if !(config.temperature_scale >= 0.0 && config.temperature_scale.is_finite()) {
            return Err(PlaceError::InvalidConfig(format!(
                "temperature_scale must be a non-negative number, got {}",
                config.temperature_scale
            )));
        }
        Ok(Self {
            warmup_samples: config.warmup_samples,
            temperature_scale: config.temperature_scale,
            cooling: CoolingSchedule::from_name(&config.cooling_schedule, config.cooling_rate)?,
            seed: config.seed,
        })
    }
}

impl Default for AnnealParams {
    fn default() -> Self {
        Self {
            warmup_samples: 50,
            temperature_scale: 20.0,
            cooling: CoolingSchedule::default(),
            seed: None,
        }
    }
}

/// What a single [`AnnealingController::advance`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepOutcome {
    Placed,
    Calibrated {
        temperature: f64,
        cost: u64,
    },
    /// `delta` is the proposed change; rejected swaps are already undone.
    Annealed {
        accepted: bool,
        delta: i64,
        cost: u64,
        temperature: f64,
    },
}

pub struct AnnealingController {
    circuit: Circuit,
    grid: Grid,
    moves: MoveGenerator,
    params: AnnealParams,
    phase: PlacementPhase,
    temperature: f64,
    cost: u64,
    steps: usize,
    accepted: usize,
}

impl AnnealingController {
    pub fn new(circuit: Circuit, params: AnnealParams) -> Result<Self> {
        let grid = Grid::for_circuit(&circuit)?;
        let moves = MoveGenerator::new(params.seed);
        Ok(Self {
            circuit,
            grid,
            moves,
            params,
            phase: PlacementPhase::Idle,
            temperature: 0.0,
            cost: 0,
            steps: 0,
            accepted: 0,
        })
    }

    pub fn advance(&mut self) -> Result<StepOutcome> {
        match self.phase {
            PlacementPhase::Idle => self.initial_placement(),
            PlacementPhase::Initializing => self.calibrate(),
            PlacementPhase::Iterating => self.anneal_step(),
        }
    }

    fn initial_placement(&mut self) -> Result<StepOutcome> {
        self.moves.random_placement(&self.circuit, &mut self.grid)?;
        self.phase = PlacementPhase::Initializing;
        log::info!(
            "Placed {} cells at random on a {}x{} grid",
            self.circuit.num_cells(),
            self.grid.cols(),
            self.grid.rows()
        );
        Ok(StepOutcome::Placed)
    }

    fn calibrate(&mut self) -> Result<StepOutcome> {
        let k = self.params.warmup_samples;
        if k == 0 {
            return Err(PlaceError::EmptySample);
        }

        // The walk is kept: it becomes the starting placement.
        let mut cost = cost::total_cost(&self.circuit, &self.grid);
        let mut sample = Vec::with_capacity(k);
        for _ in 0..k {
            let mv = self.moves.propose_swap(&self.circuit, &mut self.grid)?;
            cost = cost.saturating_add_signed(mv.delta);
            sample.push(cost);
        }

        let spread = stats::std_deviation(&sample)?;
        self.temperature = self.params.temperature_scale * spread;
        self.cost = cost;
        self.phase = PlacementPhase::Iterating;

        if self.temperature == 0.0 {
            log::warn!(
                "Warm-up costs did not vary over {} swaps; annealing starts cold",
                k
            );
        }
        log::info!(
            "Calibrated: std dev {:.3} over {} swaps, T0 = {:.3}, cost = {}",
            spread,
            k,
            self.temperature,
            self.cost
        );
        Ok(StepOutcome::Calibrated {
            temperature: self.temperature,
            cost: self.cost,
        })
    }

    fn anneal_step(&mut self) -> Result<StepOutcome> {
        let mv = self.moves.propose_swap(&self.circuit, &mut self.grid)?;

        let accepted = mv.delta <= 0
            || acceptance::accept(mv.delta, self.temperature, self.moves.unit());
        if accepted {
            self.cost = self.cost.saturating_add_signed(mv.delta);
            self.accepted += 1;
        } else {
            MoveGenerator::revert(&mut self.grid, &mv)?;
        }

        self.temperature = self.params.cooling.cool(self.temperature);
        self.steps += 1;

        log::trace!(
            "step {}: {} <-> {} delta {} {} cost {} T {:.4}",
            self.steps,
            mv.a,
            mv.b,
            mv.delta,
            if accepted { "accepted" } else { "rejected" },
            self.cost,
            self.temperature
        );

        Ok(StepOutcome::Annealed {
            accepted,
            delta: mv.delta,
            cost: self.cost,
            temperature: self.temperature,
        })
    }

    pub fn phase(&self) -> PlacementPhase {
        self.phase
    }
    pub fn temperature(&self) -> f64 {
        self.temperature
    }
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Cost tracked incrementally since calibration.
    pub fn cost(&self) -> u64 {
        self.cost
    }

    /// Full recomputation from current positions.
    pub fn total_cost(&self) -> u64 {
        cost::total_cost(&self.circuit, &self.grid)
    }

    /// Annealing steps run so far, not counting the warm-up.
    pub fn steps(&self) -> usize {
        self.steps
    }
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Human-readable snapshot of cell positions and net endpoints.
    pub fn debug_dump(&self) -> String {
        let grid = &self.grid;
        let at = |cell| match grid.position(cell) {
            Some(pos) => pos.to_string(),
            None => "unplaced".to_string(),
        };

        let mut out = String::new();
        let _ = writeln!(
            out,
            "phase={} temperature={:.4} steps={} accepted={}",
            self.phase, self.temperature, self.steps, self.accepted
        );
        let _ = writeln!(out, "cells ({}):", self.circuit.num_cells());
        for cell in &self.circuit.cells {
            let _ = writeln!(out, "  {} @ {}", cell.id, at(cell.id));
        }
        let _ = writeln!(out, "nets ({}):", self.circuit.num_nets());
        for net in &self.circuit.nets {
            let sinks = net
                .sinks
                .iter()
                .map(|&s| format!("{} {}", s, at(s)))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                out,
                "  {}: {} {} -> {}",
                net.id,
                net.source,
                at(net.source),
                sinks
            );
        }
        out
    }
}
