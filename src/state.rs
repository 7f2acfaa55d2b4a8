use std::path::Path;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use roster_query::{scoped_indices, QueryEngine, Roster, RosterCache, ScopeSpec, Settings};

use crate::color::ColorMap;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub engine: QueryEngine,

    /// Tracks the open dataset file (None until a file loads).
    pub cache: Option<RosterCache>,

    /// Roster currently displayed and queried.
    pub roster: Option<Arc<Roster>>,

    /// Scope inputs. The grade only applies while `grade_enabled` is set.
    pub grade_enabled: bool,
    pub grade: i64,
    pub class_input: String,
    pub region_input: String,

    /// Date the formatters treat as "today".
    pub today: NaiveDate,

    pub question: String,
    pub answer: Option<String>,

    /// Indices of records passing the current scope (cached).
    pub scoped_indices: Vec<usize>,

    /// Bar colours per class label.
    pub color_map: Option<ColorMap>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(settings: &Settings, engine: QueryEngine) -> Self {
        let scope = &settings.scope;
        Self {
            engine,
            cache: None,
            roster: None,
            grade_enabled: scope.grade.is_some(),
            grade: scope.grade.unwrap_or(8),
            class_input: scope.class_label.clone().unwrap_or_default(),
            region_input: scope.region.clone().unwrap_or_default(),
            today: Local::now().date_naive(),
            question: String::new(),
            answer: None,
            scoped_indices: Vec::new(),
            color_map: None,
            status_message: None,
        }
    }

    /// Scope described by the current inputs.
    pub fn scope(&self) -> ScopeSpec {
        let grade = self.grade_enabled.then_some(self.grade);
        ScopeSpec::from_inputs(grade, &self.class_input, &self.region_input)
    }

    /// Open `path` as the active dataset. On failure the previous roster
    /// stays loaded and the error is shown in the status line.
    pub fn open_dataset(&mut self, path: &Path) {
        match RosterCache::open(path) {
            Ok(cache) => {
                let roster = cache.roster();
                log::info!(
                    "Opened {} with {} records",
                    path.display(),
                    roster.len()
                );
                self.cache = Some(cache);
                self.set_roster(roster);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load dataset: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Pick up on-disk changes to the open dataset.
    pub fn refresh_roster(&mut self) {
        let Some(cache) = self.cache.as_mut() else {
            return;
        };
        match cache.get() {
            Ok(roster) => {
                let changed = self
                    .roster
                    .as_ref()
                    .map_or(true, |current| !Arc::ptr_eq(current, &roster));
                if changed {
                    self.set_roster(roster);
                }
                self.status_message = None;
            }
            Err(e) => {
                log::warn!("Keeping the last loaded roster: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Force a reload of the open dataset.
    pub fn reload(&mut self) {
        let Some(cache) = self.cache.as_mut() else {
            return;
        };
        match cache.reload() {
            Ok(roster) => {
                self.set_roster(roster);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Reload failed: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn set_roster(&mut self, roster: Arc<Roster>) {
        self.color_map = Some(ColorMap::new(&roster.class_keys()));
        self.roster = Some(roster);
        self.rescope();
    }

    /// Recompute `scoped_indices` after a scope change.
    pub fn rescope(&mut self) {
        let scope = self.scope();
        self.scoped_indices = match &self.roster {
            Some(roster) => scoped_indices(roster.records(), &scope),
            None => Vec::new(),
        };
    }

    /// Answer the current question over the scoped roster.
    pub fn ask(&mut self) {
        let question = self.question.trim().to_string();
        if question.is_empty() {
            return;
        }
        self.refresh_roster();

        let Some(roster) = &self.roster else {
            self.answer = Some("No dataset loaded. Use File → Open… first.".to_string());
            return;
        };
        let scoped: Vec<_> = self
            .scoped_indices
            .iter()
            .map(|&i| &roster.records()[i])
            .collect();

        log::info!("Question over {} scoped records: {question:?}", scoped.len());
        self.answer = Some(self.engine.answer_scoped(&scoped, &question, self.today));
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn state_with_file() -> (AppState, tempfile::NamedTempFile) {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "student_id,name,grade,class,region,homework_submitted\n\
             S1,Alice,8,A,North,false\n\
             S2,Bob,8,B,North,false\n\
             S3,Cara,9,a,north,false"
        )
        .unwrap();
        file.flush().unwrap();

        let mut state = AppState::new(&Settings::default(), QueryEngine::offline());
        state.open_dataset(file.path());
        (state, file)
    }

    #[test]
    fn default_inputs_scope_to_grade_8_class_a_north() {
        let (state, _file) = state_with_file();
        assert_eq!(state.scoped_indices, vec![0]);
        assert!(state.status_message.is_none());
    }

    #[test]
    fn clearing_inputs_widens_the_scope() {
        let (mut state, _file) = state_with_file();
        state.grade_enabled = false;
        state.rescope();
        assert_eq!(state.scoped_indices, vec![0, 2]);

        state.class_input.clear();
        state.region_input = " ".into();
        state.rescope();
        assert_eq!(state.scoped_indices, vec![0, 1, 2]);
    }

    #[test]
    fn ask_answers_over_scoped_records() {
        let (mut state, _file) = state_with_file();
        state.question = "Who hasn't submitted homework?".into();
        state.ask();
        assert_eq!(
            state.answer.as_deref(),
            Some("Students who haven't submitted homework: Alice")
        );
    }

    #[test]
    fn failed_open_reports_status_and_keeps_roster() {
        let (mut state, file) = state_with_file();
        let missing = file.path().with_extension("missing.csv");
        state.open_dataset(&missing);
        assert!(state.status_message.as_deref().unwrap_or("").starts_with("Error:"));
        assert_eq!(state.roster.as_ref().map(|r| r.len()), Some(3));
    }

    #[test]
    fn successful_refresh_clears_a_previous_error() {
        let (mut state, file) = state_with_file();
        let contents = std::fs::read(file.path()).unwrap();

        std::fs::remove_file(file.path()).unwrap();
        state.refresh_roster();
        assert!(state.status_message.as_deref().unwrap_or("").starts_with("Error:"));

        std::fs::write(file.path(), &contents).unwrap();
        let later = std::time::SystemTime::now() + std::time::Duration::from_secs(60);
        std::fs::File::options()
            .write(true)
            .open(file.path())
            .unwrap()
            .set_modified(later)
            .unwrap();
        state.refresh_roster();
        assert!(state.status_message.is_none());
        assert_eq!(state.roster.as_ref().map(|r| r.len()), Some(3));
    }
}
