use crate::markdown::Heading;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineEntry {
    pub id: String,
    pub title: String,
    pub level: u8,
}

impl OutlineEntry {
    pub fn href(&self) -> String {
        format!("#{}", self.id)
    }

    pub fn is_nested(&self) -> bool {
        self.level > 1
    }
}

/// Visibility ratio reported for one heading by the viewport observer.
#[derive(Clone, Debug, PartialEq)]
pub struct HeadingVisibility {
    pub id: String,
    pub ratio: f64,
}

/// In-page jump list for the current page's h1/h2 headings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outline {
    entries: Vec<OutlineEntry>,
    ratios: Vec<f64>,
    active: Option<usize>,
}

impl Outline {
    pub fn from_headings(headings: &[Heading]) -> Self {
        let entries: Vec<OutlineEntry> = headings
            .iter()
            .filter(|heading| heading.level <= 2)
            .map(|heading| OutlineEntry {
                id: heading.id.clone(),
                title: heading.text.clone(),
                level: heading.level,
            })
            .collect();
        Self {
            ratios: vec![0.0; entries.len()],
            entries,
            active: None,
        }
    }

    pub fn entries(&self) -> &[OutlineEntry] {
        &self.entries
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.map(|idx| self.entries[idx].id.as_str())
    }

    /// Returns whether the active entry changed.
    pub fn set_active(&mut self, id: &str) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        let changed = self.active != Some(idx);
        self.active = Some(idx);
        changed
    }

    /// Folds observer reports in and re-picks the most visible heading.
    ///
    /// Only headings at or above `threshold` compete; ties go to the earlier
    /// heading. With nothing over the threshold the previous entry stays.
    pub fn observe(&mut self, reports: &[HeadingVisibility], threshold: f64) -> bool {
        for report in reports {
            if let Some(idx) = self.position(&report.id) {
                self.ratios[idx] = report.ratio;
            }
        }

        let mut best: Option<(usize, f64)> = None;
        for (idx, &ratio) in self.ratios.iter().enumerate() {
            if ratio < threshold {
                continue;
            }
            if best.map_or(true, |(_, top)| ratio > top) {
                best = Some((idx, ratio));
            }
        }

        match best {
            Some((idx, _)) if self.active != Some(idx) => {
                self.active = Some(idx);
                true
            }
            _ => false,
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }
}
