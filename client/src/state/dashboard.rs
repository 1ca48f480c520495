//! Dashboard view state: filters, image list, cursor, and label override.
//!
//! SYSTEM CONTEXT
//! ==============
//! `DashboardPage` holds one `RwSignal<DashboardState>` and drives it from
//! user events and network completions. Every method here is synchronous;
//! methods that need data return a request description and the page performs
//! the call, then feeds the result back in.
//!
//! DESIGN
//! ======
//! Image-list requests carry a sequence number. Only the response to the
//! latest request is applied, so a slow response for an old filter can never
//! overwrite a newer list. Changing fab also bumps the sequence, which drops
//! any response still in flight for the previous fab.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::fmt;
use std::str::FromStr;

use time::OffsetDateTime;

use crate::net::api::ApiError;
use crate::net::types::{FabCameraMap, GroundTruth, ImageQuery, ImageRecord};
use crate::util::dates::yesterday;

// =============================================================================
// DEFECT LABELS
// =============================================================================

/// The fixed set of labels a reviewer can assign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DefectLabel {
    Center,
    Donut,
    EdgeLoc,
    EdgeRing,
    Loc,
    NearFull,
    Random,
    Scratch,
    None,
}

impl DefectLabel {
    pub const ALL: [Self; 9] = [
        Self::Center,
        Self::Donut,
        Self::EdgeLoc,
        Self::EdgeRing,
        Self::Loc,
        Self::NearFull,
        Self::Random,
        Self::Scratch,
        Self::None,
    ];

    /// Wire spelling, as stored by the ground-truth endpoint.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Center => "Center",
            Self::Donut => "Donut",
            Self::EdgeLoc => "Edge-Loc",
            Self::EdgeRing => "Edge-Ring",
            Self::Loc => "Loc",
            Self::NearFull => "Near-full",
            Self::Random => "Random",
            Self::Scratch => "Scratch",
            Self::None => "none",
        }
    }
}

impl fmt::Display for DefectLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown defect label: {0}")]
pub struct UnknownLabel(pub String);

impl FromStr for DefectLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_owned()))
    }
}

// =============================================================================
// OUTCOMES
// =============================================================================

/// An image-list fetch the page should perform.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageRequest {
    pub seq: u64,
    pub query: ImageQuery,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DevicesOutcome {
    Loaded,
    /// The mapping could not be loaded; the dashboard continues with none.
    Failed(ApiError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImagesOutcome {
    Applied,
    /// A newer request was issued after this one; the result was dropped.
    Stale,
    /// The fetch failed; the list was replaced with an empty one.
    Failed(ApiError),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved,
    Failed(ApiError),
}

// =============================================================================
// STATE
// =============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardState {
    /// True until the fab mapping has been loaded (or failed to load).
    pub loading: bool,
    pub fabs: Vec<String>,
    pub cameras: FabCameraMap,
    /// Empty when no fab is selected.
    pub selected_fab: String,
    /// Empty when no camera is selected.
    pub selected_camera: String,
    pub from_date: OffsetDateTime,
    pub to_date: OffsetDateTime,
    pub images: Vec<ImageRecord>,
    pub cursor: usize,
    /// Percentage of `images` whose prediction is not `"none"`.
    pub defect_rate: f64,
    /// Reviewer's corrected label for the image under the cursor.
    pub override_label: Option<DefectLabel>,
    pub submitting: bool,
    latest_seq: u64,
}

impl DashboardState {
    /// Fresh state with both date bounds at `now`.
    #[must_use]
    pub fn new(now: OffsetDateTime) -> Self {
        Self {
            loading: true,
            fabs: Vec::new(),
            cameras: FabCameraMap::default(),
            selected_fab: String::new(),
            selected_camera: String::new(),
            from_date: now,
            to_date: now,
            images: Vec::new(),
            cursor: 0,
            defect_rate: 0.0,
            override_label: None,
            submitting: false,
            latest_seq: 0,
        }
    }

    /// Install the fab mapping. On success the from-date moves to one day
    /// before `now`; on failure the mapping stays empty.
    pub fn apply_devices(&mut self, result: Result<FabCameraMap, ApiError>, now: OffsetDateTime) -> DevicesOutcome {
        self.loading = false;
        match result {
            Ok(map) => {
                self.fabs = map.fab_ids();
                self.cameras = map;
                self.from_date = yesterday(now);
                DevicesOutcome::Loaded
            }
            Err(e) => {
                self.fabs.clear();
                self.cameras = FabCameraMap::default();
                DevicesOutcome::Failed(e)
            }
        }
    }

    #[must_use]
    pub fn camera_options(&self) -> &[String] {
        if self.selected_fab.is_empty() {
            return &[];
        }
        self.cameras.cameras_for(&self.selected_fab)
    }

    /// Select a fab and clear everything scoped to the previous one.
    /// Does not fetch.
    pub fn select_fab(&mut self, fab: &str) {
        self.selected_fab = fab.to_owned();
        self.selected_camera.clear();
        self.images.clear();
        self.cursor = 0;
        self.defect_rate = 0.0;
        self.override_label = None;
        self.latest_seq += 1;
    }

    pub fn select_camera(&mut self, camera: &str) -> Option<ImageRequest> {
        self.selected_camera = camera.to_owned();
        self.request_images()
    }

    pub fn set_from_date(&mut self, date: OffsetDateTime) -> Option<ImageRequest> {
        self.from_date = date;
        self.request_images()
    }

    pub fn set_to_date(&mut self, date: OffsetDateTime) -> Option<ImageRequest> {
        self.to_date = date;
        self.request_images()
    }

    /// Issue a request for the current filter. With no camera selected the
    /// list is emptied immediately and nothing needs fetching.
    fn request_images(&mut self) -> Option<ImageRequest> {
        self.latest_seq += 1;
        if self.selected_camera.is_empty() {
            self.replace_images(Vec::new());
            return None;
        }
        Some(ImageRequest {
            seq: self.latest_seq,
            query: ImageQuery {
                fab: self.selected_fab.clone(),
                camera: self.selected_camera.clone(),
                fromts: self.from_date.unix_timestamp(),
                tots: self.to_date.unix_timestamp(),
            },
        })
    }

    pub fn apply_images(&mut self, seq: u64, result: Result<Vec<ImageRecord>, ApiError>) -> ImagesOutcome {
        if seq != self.latest_seq {
            return ImagesOutcome::Stale;
        }
        match result {
            Ok(images) => {
                self.replace_images(images);
                ImagesOutcome::Applied
            }
            Err(e) => {
                self.replace_images(Vec::new());
                ImagesOutcome::Failed(e)
            }
        }
    }

    fn replace_images(&mut self, images: Vec<ImageRecord>) {
        self.defect_rate = defect_rate(&images);
        self.images = images;
        if self.cursor >= self.images.len() {
            self.cursor = 0;
        }
        self.override_label = None;
    }

    #[must_use]
    pub fn current_image(&self) -> Option<&ImageRecord> {
        self.images.get(self.cursor)
    }

    pub fn next_image(&mut self) {
        let len = self.images.len();
        if len == 0 {
            return;
        }
        self.cursor = if self.cursor + 1 >= len { 0 } else { self.cursor + 1 };
        self.override_label = None;
    }

    pub fn prev_image(&mut self) {
        let len = self.images.len();
        if len == 0 {
            return;
        }
        self.cursor = if self.cursor == 0 || self.cursor >= len { len - 1 } else { self.cursor - 1 };
        self.override_label = None;
    }

    pub fn select_override(&mut self, label: DefectLabel) {
        self.override_label = Some(label);
    }

    /// The correction for the image under the cursor, if one is chosen.
    #[must_use]
    pub fn ground_truth(&self) -> Option<GroundTruth> {
        let image = self.current_image()?;
        let label = self.override_label?;
        Some(GroundTruth {
            imgid: image.imgid.clone(),
            fab: self.selected_fab.clone(),
            camera: self.selected_camera.clone(),
            truth: label.as_str().to_owned(),
        })
    }

    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.submitting && self.ground_truth().is_some()
    }

    pub fn begin_submit(&mut self) -> Option<GroundTruth> {
        if self.submitting {
            return None;
        }
        let truth = self.ground_truth()?;
        self.submitting = true;
        Some(truth)
    }

    pub fn finish_submit(&mut self, result: Result<(), ApiError>) -> SubmitOutcome {
        self.submitting = false;
        match result {
            Ok(()) => SubmitOutcome::Saved,
            Err(e) => SubmitOutcome::Failed(e),
        }
    }
}

// =============================================================================
// DERIVED VALUES
// =============================================================================

/// Percentage of records whose prediction is not `"none"`; 0 for no records.
#[must_use]
pub fn defect_rate(images: &[ImageRecord]) -> f64 {
    if images.is_empty() {
        return 0.0;
    }
    let defects = images.iter().filter(|r| r.is_defect()).count();
    #[allow(clippy::cast_precision_loss)]
    let rate = defects as f64 / images.len() as f64 * 100.0;
    rate
}

#[must_use]
pub fn format_defect_rate(rate: f64) -> String {
    format!("{rate:.2}%")
}

#[must_use]
pub fn format_probability(probability: f64) -> String {
    format!("{probability:.4}")
}
