use hashbrown::HashSet;

use crate::triangulation::BoundingBox;
use crate::types::{TriangleId, Triangles};

/// Defines debug recording of the Triangulation
#[derive(Debug, Clone)]
pub enum PhaseRecord {
    /// Records all the phases
    All,
    /// Records the steps during the specified phase
    In(Phase),
    /// Records the steps during the specified phases
    InAny(HashSet<Phase>),
}

/// Defines debug recording of the Triangulation
#[derive(Debug, Clone)]
pub enum StepsRecord {
    /// Records all the steps
    All,
    /// Records all the steps after the specified one (inclusive)
    From(usize),
    /// Records all the steps until the specified one (inclusive)
    Until(usize),
    /// Records all the steps between the specified ones (inclusive)
    Between(usize, usize),
}

#[derive(Debug, Clone)]
pub struct DebugConfiguration {
    pub phase_record: PhaseRecord,
    pub steps_record: StepsRecord,
    /// [None] means that it won't force an early exit
    pub force_end_at_step: Option<usize>,
}
impl Default for DebugConfiguration {
    fn default() -> Self {
        Self {
            phase_record: PhaseRecord::All,
            steps_record: StepsRecord::All,
            force_end_at_step: Default::default(),
        }
    }
}

pub struct DebugSnapshot {
    pub step: usize,
    pub phase: Phase,
    /// Ids of the triangles created or moved during this phase, in `triangles`
    pub changed_ids: Vec<TriangleId>,
    pub triangles: Triangles,
}
impl DebugSnapshot {
    pub(crate) fn new(
        step: usize,
        phase: Phase,
        triangles: Triangles,
        changed_ids: Vec<TriangleId>,
    ) -> Self {
        Self {
            step,
            phase,
            triangles,
            changed_ids,
        }
    }
}

pub struct DebugContext {
    pub config: DebugConfiguration,

    /// Bounding box of the input vertices
    pub bounds: BoundingBox,

    pub snapshots: Vec<DebugSnapshot>,
    /// One step per inserted vertex. Step 0 is before the first insertion.
    pub current_step: usize,
}

impl DebugContext {
    pub(crate) fn new(config: DebugConfiguration, bounds: BoundingBox) -> Self {
        Self {
            config,
            bounds,
            snapshots: Vec::new(),
            current_step: 0,
        }
    }

    pub(crate) fn push_snapshot(
        &mut self,
        phase: Phase,
        triangles: &Triangles,
        changed_ids: &[TriangleId],
    ) {
        let record = match &self.config.phase_record {
            PhaseRecord::All => true,
            PhaseRecord::InAny(phases) => phases.contains(&phase),
            PhaseRecord::In(rec_phase) => phase == *rec_phase,
        };
        if !record {
            return;
        }
        if match self.config.steps_record {
            StepsRecord::All => true,
            StepsRecord::From(from) => self.current_step >= from,
            StepsRecord::Until(to) => self.current_step <= to,
            StepsRecord::Between(from, to) => self.current_step >= from && self.current_step <= to,
        } {
            self.snapshots.push(DebugSnapshot::new(
                self.current_step,
                phase,
                triangles.clone(),
                changed_ids.to_vec(),
            ));
        }
    }

    /// Returns true if the algorithm should stop
    pub(crate) fn advance_step(&mut self) -> bool {
        self.current_step += 1;
        match self.config.force_end_at_step {
            Some(end_step) => self.current_step > end_step,
            None => false,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Phase {
    /// The container triangle was created
    SuperTriangle,
    /// Triangles were moved to the completed triangles. Snapshot contains the completed triangles.
    FinalizeEarly,
    /// Triangles invalidated by the inserted vertex were removed
    RemoveBadTriangles,
    /// The hole left by the removed triangles was filled with new triangles
    Retriangulate,
    /// Triangles connected to the container triangle were removed
    RemoveWrapping,
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////
