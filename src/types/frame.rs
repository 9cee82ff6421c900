//! Per-position frame data: one structure (or a piece of one) as parallel arrays.
//!
//! `FrameData` holds coordinates plus optional per-position attributes. Every
//! present attribute has exactly one entry per coordinate; all slicing,
//! truncating and appending goes through methods here so the arrays can never
//! drift apart.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A 3-D position in angstroms.
pub type Point3 = DVec3;

/// Kind of a frame position, written as its single-letter code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PositionType {
    /// Amino acid, represented by its CA atom.
    #[serde(rename = "P")]
    Protein,
    /// DNA nucleotide, represented by C4'.
    #[serde(rename = "D")]
    Dna,
    /// RNA nucleotide, represented by C4'.
    #[serde(rename = "R")]
    Rna,
    /// One heavy atom of a ligand.
    #[serde(rename = "L")]
    Ligand,
}

impl PositionType {
    pub fn code(self) -> char {
        match self {
            PositionType::Protein => 'P',
            PositionType::Dna => 'D',
            PositionType::Rna => 'R',
            PositionType::Ligand => 'L',
        }
    }
}

/// Parallel per-position arrays for one structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameData {
    pub coords: Vec<Point3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plddts: Option<Vec<f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_names: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chains: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub residue_numbers: Option<Vec<i32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_types: Option<Vec<PositionType>>,
}

/// Which optional field disagreed with the coordinate count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLengthMismatch {
    pub field: &'static str,
    pub expected: usize,
    pub actual: usize,
}

impl std::fmt::Display for FieldLengthMismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} has {} entries but there are {} coordinates",
            self.field, self.actual, self.expected
        )
    }
}

impl std::error::Error for FieldLengthMismatch {}

/// Drop `field` if its length disagrees with `n`.
fn keep_if_len<T>(field: Option<Vec<T>>, n: usize, name: &str) -> Option<Vec<T>> {
    match field {
        Some(values) if values.len() != n => {
            log::warn!(
                "{} length ({}) does not match coordinate count ({}); dropping it",
                name,
                values.len(),
                n
            );
            None
        }
        other => other,
    }
}

fn slice_field<T: Clone>(field: &Option<Vec<T>>, range: Range<usize>) -> Option<Vec<T>> {
    field.as_ref().map(|values| values[range].to_vec())
}

fn truncate_field<T>(field: &mut Option<Vec<T>>, len: usize) {
    if let Some(values) = field {
        values.truncate(len);
    }
}

/// Append `source[from..]` onto `target`. Returns false (and drops `target`)
/// when the source lacks the field, since appending nothing would desync it.
fn extend_field<T: Clone>(
    target: &mut Option<Vec<T>>,
    source: &Option<Vec<T>>,
    from: usize,
    name: &str,
) -> bool {
    let Some(values) = target.as_mut() else {
        return true;
    };
    match source {
        Some(incoming) => {
            values.extend_from_slice(incoming.get(from..).unwrap_or_default());
            true
        }
        None => {
            log::warn!("incoming frame has no {}; dropping it from the combined frame", name);
            *target = None;
            false
        }
    }
}

impl FrameData {
    /// Frame with coordinates only.
    pub fn from_coords(coords: Vec<Point3>) -> Self {
        Self {
            coords,
            ..Default::default()
        }
    }

    /// Build a frame, dropping any optional field whose length disagrees with
    /// the coordinate count.
    pub fn from_parts(
        coords: Vec<Point3>,
        plddts: Option<Vec<f64>>,
        position_names: Option<Vec<String>>,
        chains: Option<Vec<String>>,
        residue_numbers: Option<Vec<i32>>,
        position_types: Option<Vec<PositionType>>,
    ) -> Self {
        let n = coords.len();
        Self {
            coords,
            plddts: keep_if_len(plddts, n, "plddts"),
            position_names: keep_if_len(position_names, n, "position_names"),
            chains: keep_if_len(chains, n, "chains"),
            residue_numbers: keep_if_len(residue_numbers, n, "residue_numbers"),
            position_types: keep_if_len(position_types, n, "position_types"),
        }
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Check that every present field has one entry per coordinate.
    pub fn validate(&self) -> Result<(), FieldLengthMismatch> {
        let expected = self.coords.len();
        let lengths = [
            ("plddts", self.plddts.as_ref().map(Vec::len)),
            ("position_names", self.position_names.as_ref().map(Vec::len)),
            ("chains", self.chains.as_ref().map(Vec::len)),
            ("residue_numbers", self.residue_numbers.as_ref().map(Vec::len)),
            ("position_types", self.position_types.as_ref().map(Vec::len)),
        ];
        for (field, len) in lengths {
            if let Some(actual) = len {
                if actual != expected {
                    return Err(FieldLengthMismatch {
                        field,
                        expected,
                        actual,
                    });
                }
            }
        }
        Ok(())
    }

    /// Sub-frame `[start, end)` of every present field.
    ///
    /// `end` is clamped to the frame length; an inverted range yields an empty
    /// frame that keeps the same set of present fields.
    pub fn slice(&self, start: usize, end: usize) -> FrameData {
        let end = end.min(self.len());
        let start = start.min(end);
        let range = start..end;
        FrameData {
            coords: self.coords[range.clone()].to_vec(),
            plddts: slice_field(&self.plddts, range.clone()),
            position_names: slice_field(&self.position_names, range.clone()),
            chains: slice_field(&self.chains, range.clone()),
            residue_numbers: slice_field(&self.residue_numbers, range.clone()),
            position_types: slice_field(&self.position_types, range),
        }
    }

    /// Shorten every present field to `len` positions.
    pub fn truncate(&mut self, len: usize) {
        self.coords.truncate(len);
        truncate_field(&mut self.plddts, len);
        truncate_field(&mut self.position_names, len);
        truncate_field(&mut self.chains, len);
        truncate_field(&mut self.residue_numbers, len);
        truncate_field(&mut self.position_types, len);
    }

    /// Append `other[from..]` to every present field, taking coordinates from
    /// `coords` (a transformed copy of `other.coords`) instead of `other`.
    ///
    /// Fields present here but absent in `other` are dropped; fields only
    /// `other` carries are ignored. Returns the names of dropped fields.
    pub fn extend_from(
        &mut self,
        other: &FrameData,
        coords: &[Point3],
        from: usize,
    ) -> Vec<&'static str> {
        let from = from.min(coords.len());
        self.coords.extend_from_slice(&coords[from..]);

        let from = from.min(other.len());
        let mut dropped = Vec::new();
        if !extend_field(&mut self.plddts, &other.plddts, from, "plddts") {
            dropped.push("plddts");
        }
        if !extend_field(
            &mut self.position_names,
            &other.position_names,
            from,
            "position_names",
        ) {
            dropped.push("position_names");
        }
        if !extend_field(&mut self.chains, &other.chains, from, "chains") {
            dropped.push("chains");
        }
        if !extend_field(
            &mut self.residue_numbers,
            &other.residue_numbers,
            from,
            "residue_numbers",
        ) {
            dropped.push("residue_numbers");
        }
        if !extend_field(
            &mut self.position_types,
            &other.position_types,
            from,
            "position_types",
        ) {
            dropped.push("position_types");
        }
        dropped
    }

    /// Viewer payload: the frame as JSON with pLDDT rounded to integers.
    pub fn to_json(&self) -> serde_json::Result<String> {
        let mut payload = self.clone();
        if let Some(plddts) = payload.plddts.as_mut() {
            for p in plddts.iter_mut() {
                *p = p.round();
            }
        }
        serde_json::to_string(&payload)
    }
}
