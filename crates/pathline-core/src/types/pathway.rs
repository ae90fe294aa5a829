//! Pathways and their frames.
//!
//! A pathway is one successful source-to-target trajectory, ordered from
//! source departure to target arrival. Extraction tools emit frames in the
//! reverse of that order (target first, walking parents backwards), as flat
//! numeric records; [`Frame::from_record`] and
//! [`Pathway::from_reversed_records`] normalize that form.

use serde::{Deserialize, Serialize};

use super::symbols::StateId;

/// Minimum number of columns in a raw frame record:
/// iteration, segment, state, auxiliary value, weight.
pub const WEIGHT_COLUMN_MIN: usize = 5;

/// One simulation frame of a pathway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Iteration the frame belongs to. Iteration 0 never occurs in real
    /// data and marks filler frames appended by padding.
    pub iteration: u32,
    /// Segment id within the iteration.
    pub segment: i64,
    /// Discrete state id; rewritten by reassignment.
    pub state: StateId,
    /// Auxiliary progress value carried along for custom strategies.
    pub aux: f64,
    /// Statistical weight of the walker at this frame.
    pub weight: f64,
}

impl Frame {
    /// Parse a raw extracted record. Layout: iteration, segment, state,
    /// auxiliary value, any number of extra feature columns, weight last.
    /// Returns `None` when fewer than [`WEIGHT_COLUMN_MIN`] columns are present.
    pub fn from_record(record: &[f64]) -> Option<Self> {
        if record.len() < WEIGHT_COLUMN_MIN {
            return None;
        }
        Some(Self {
            iteration: record[0] as u32,
            segment: record[1] as i64,
            state: record[2] as StateId,
            aux: record[3],
            weight: record[record.len() - 1],
        })
    }

    /// Whether this frame is padding filler rather than real data.
    pub fn is_filler(&self) -> bool {
        self.iteration == 0
    }
}

/// One successful trajectory, source to target.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Pathway {
    pub frames: Vec<Frame>,
}

impl Pathway {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self { frames }
    }

    /// Build a pathway from records stored target-first, restoring
    /// chronological (source to target) order.
    pub fn from_reversed_records(mut frames: Vec<Frame>) -> Self {
        frames.reverse();
        Self { frames }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Frames holding real simulation data (iteration != 0).
    pub fn live_frames(&self) -> impl Iterator<Item = &Frame> {
        self.frames.iter().filter(|f| !f.is_filler())
    }

    /// The full state sequence, padding included.
    pub fn state_sequence(&self) -> Vec<StateId> {
        self.frames.iter().map(|f| f.state).collect()
    }

    /// The state sequence with every `unknown` state removed.
    pub fn stripped_sequence(&self, unknown: StateId) -> Vec<StateId> {
        self.frames
            .iter()
            .map(|f| f.state)
            .filter(|&s| s != unknown)
            .collect()
    }

    /// Weight of the last frame whose state is not `unknown`.
    /// `None` when every frame is unknown.
    pub fn terminal_live_weight(&self, unknown: StateId) -> Option<f64> {
        self.frames
            .iter()
            .rev()
            .find(|f| f.state != unknown)
            .map(|f| f.weight)
    }

    /// Weight of the literal last frame, zero for an empty pathway.
    pub fn terminal_raw_weight(&self) -> f64 {
        self.frames.last().map_or(0.0, |f| f.weight)
    }
}

/// The loaded collection of pathways. Ragged: pathways keep their
/// natural lengths until padding appends explicit filler frames.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathwayEnsemble {
    pub pathways: Vec<Pathway>,
}

impl PathwayEnsemble {
    pub fn new(pathways: Vec<Pathway>) -> Self {
        Self { pathways }
    }

    pub fn len(&self) -> usize {
        self.pathways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pathways.is_empty()
    }

    /// Length of the longest member pathway.
    pub fn max_len(&self) -> usize {
        self.pathways.iter().map(Pathway::len).max().unwrap_or(0)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Pathway> {
        self.pathways.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Pathway> {
        self.pathways.iter_mut()
    }

    /// Highest state id referenced by any live frame, `None` for no live data.
    pub fn max_live_state(&self) -> Option<StateId> {
        self.pathways
            .iter()
            .flat_map(|p| p.live_frames())
            .map(|f| f.state)
            .max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(iteration: u32, segment: i64, state: StateId, weight: f64) -> Frame {
        Frame {
            iteration,
            segment,
            state,
            aux: 0.0,
            weight,
        }
    }

    #[test]
    fn record_parsing_takes_weight_from_last_column() {
        let rec = [3.0, 7.0, 2.0, 4.5, 9.9, 0.125];
        let f = Frame::from_record(&rec).unwrap();
        assert_eq!(f.iteration, 3);
        assert_eq!(f.segment, 7);
        assert_eq!(f.state, 2);
        assert!((f.aux - 4.5).abs() < 1e-12);
        assert!((f.weight - 0.125).abs() < 1e-12);
    }

    #[test]
    fn record_parsing_rejects_short_rows() {
        assert!(Frame::from_record(&[1.0, 2.0, 3.0, 4.0]).is_none());
        assert!(Frame::from_record(&[]).is_none());
    }

    #[test]
    fn reversed_records_are_restored_to_chronological_order() {
        let p = Pathway::from_reversed_records(vec![
            frame(5, 0, 2, 0.5),
            frame(4, 0, 1, 0.5),
            frame(3, 0, 0, 0.5),
        ]);
        let iterations: Vec<u32> = p.frames.iter().map(|f| f.iteration).collect();
        assert_eq!(iterations, vec![3, 4, 5]);
    }

    #[test]
    fn terminal_live_weight_skips_unknown_tail() {
        let unknown = 9;
        let p = Pathway::new(vec![
            frame(1, 0, 0, 0.1),
            frame(2, 0, 1, 0.2),
            frame(0, 0, unknown, 0.0),
            frame(0, 0, unknown, 0.0),
        ]);
        assert_eq!(p.terminal_live_weight(unknown), Some(0.2));
        assert_eq!(p.terminal_raw_weight(), 0.0);
    }

    #[test]
    fn terminal_live_weight_is_none_for_all_unknown() {
        let p = Pathway::new(vec![frame(0, 0, 9, 0.0)]);
        assert_eq!(p.terminal_live_weight(9), None);
    }

    #[test]
    fn ensemble_max_len_and_max_state() {
        let e = PathwayEnsemble::new(vec![
            Pathway::new(vec![frame(1, 0, 4, 0.5)]),
            Pathway::new(vec![frame(1, 1, 0, 0.5), frame(2, 1, 2, 0.5)]),
        ]);
        assert_eq!(e.max_len(), 2);
        assert_eq!(e.max_live_state(), Some(4));
        assert_eq!(PathwayEnsemble::default().max_len(), 0);
    }

    #[test]
    fn pathways_serialize_as_bare_frame_lists() {
        let e = PathwayEnsemble::new(vec![Pathway::new(vec![frame(1, 2, 0, 0.5)])]);
        let json = serde_json::to_string(&e).unwrap();
        assert!(json.starts_with("[["), "transparent ensemble repr, got {json}");
        let back: PathwayEnsemble = serde_json::from_str(&json).unwrap();
        assert_eq!(back, e);
    }

    #[test]
    fn stripped_sequence_removes_unknown_everywhere() {
        let p = Pathway::new(vec![
            frame(1, 0, 9, 0.1),
            frame(2, 0, 1, 0.1),
            frame(3, 0, 9, 0.1),
            frame(4, 0, 0, 0.1),
        ]);
        assert_eq!(p.stripped_sequence(9), vec![1, 0]);
        assert_eq!(p.state_sequence(), vec![9, 1, 9, 0]);
    }
}
