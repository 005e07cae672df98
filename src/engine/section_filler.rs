// ==========================================
// Campus Administration Platform - Section Fill Engine
// ==========================================
// Greedy, capacity-aware, load-balancing bin fill.
// Input: eligible students in roster order + open sections with their
// occupancy at the start of the run.
// Output: (student, section) assignments + the unplaced remainder.
// Pure: no I/O, no store access.
// ==========================================

use tracing::instrument;

/// One section with spare capacity at the start of a bulk run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenSection {
    pub section: String,
    /// Occupancy when the run started; becomes the running count as
    /// students are placed.
    pub current_count: u32,
}

/// Result of one fill run.
#[derive(Debug, Clone)]
pub struct FillOutcome {
    /// (student_id, section) pairs in the order they were decided.
    pub assignments: Vec<(String, String)>,
    /// Students left unassigned because total capacity ran out,
    /// still in roster order.
    pub unassigned: Vec<String>,
    /// Sections with their running counts after the walk, in fill order.
    pub final_counts: Vec<OpenSection>,
}

// ==========================================
// SectionFiller
// ==========================================
pub struct SectionFiller {
    capacity: u32,
}

impl SectionFiller {
    pub fn new(capacity: u32) -> Self {
        Self { capacity }
    }

    /// Fill open sections with eligible students.
    ///
    /// Rules:
    /// 1) sections are sorted ascending by occupancy ONCE, before the
    ///    walk (stable sort: ties keep the department's section order)
    /// 2) students are walked in roster order, never re-sorted
    /// 3) a cursor fills the current section until its running count
    ///    reaches capacity, then advances; occupancy is tracked
    ///    in memory, the store is not re-queried mid-run
    /// 4) when the cursor runs past the last section, the remaining
    ///    students stay unassigned (partial success, not failure)
    #[instrument(skip(self, eligible, open_sections), fields(
        eligible_count = eligible.len(),
        open_sections = open_sections.len(),
        capacity = self.capacity
    ))]
    pub fn fill(&self, eligible: &[String], mut open_sections: Vec<OpenSection>) -> FillOutcome {
        // least-filled section first; sort_by_key is stable
        open_sections.sort_by_key(|s| s.current_count);

        let mut assignments = Vec::new();
        let mut unassigned = Vec::new();
        let mut cursor = 0usize;

        for student_id in eligible {
            // skip sections already full (defensive: callers pass only
            // open sections, but an overfilled count must not underflow
            // into an over-capacity write)
            while cursor < open_sections.len()
                && open_sections[cursor].current_count >= self.capacity
            {
                cursor += 1;
            }
            if cursor >= open_sections.len() {
                unassigned.push(student_id.clone());
                continue;
            }

            let slot = &mut open_sections[cursor];
            assignments.push((student_id.clone(), slot.section.clone()));
            slot.current_count += 1;
        }

        FillOutcome {
            assignments,
            unassigned,
            final_counts: open_sections,
        }
    }
}
