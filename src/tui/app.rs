use std::time::{Duration, Instant};

use keymods_core::tracker::compose;
use keymods_core::{
    ExternalChange, GroupStatus, KeyGroup, MaskLayout, ModifierIdentity, PresetMatch,
    SettingsError, SettingsSync, SymbolKey, SymbolTable, TomlStore, TrackerState,
};
use strum::IntoEnumIterator;

const MAX_ACTIVITY_LINES: usize = 200;
const RELOAD_INTERVAL: Duration = Duration::from_secs(1);

/// Selector entry shown for a group
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SelectorEntry {
    Preset(usize),
    Saved,
}

pub struct App {
    pub store: TomlStore,
    pub sync: SettingsSync,
    pub groups: Vec<KeyGroup>,
    pub group_index: usize,
    pub row: usize,
    /// Text being typed into the selected field
    pub edit_buffer: Option<String>,
    pub status: String,
    pub activity: Vec<String>,
    last_reload: Instant,
}

impl App {
    pub fn open(mut store: TomlStore) -> Self {
        let sync = SettingsSync::attach(&mut store);
        Self {
            store,
            sync,
            groups: KeyGroup::iter().collect(),
            group_index: 0,
            row: 0,
            edit_buffer: None,
            status: "Ready".to_string(),
            activity: vec![],
            last_reload: Instant::now(),
        }
    }

    pub fn group(&self) -> KeyGroup {
        self.groups[self.group_index]
    }

    pub fn selected_key(&self) -> SymbolKey {
        let keys = self.group().keys();
        keys[self.row.min(keys.len() - 1)]
    }

    pub fn status_of(&self, group: KeyGroup) -> GroupStatus {
        self.sync.status(group)
    }

    pub fn is_editing(&self) -> bool {
        self.edit_buffer.is_some()
    }

    pub fn set_status<S: Into<String>>(&mut self, msg: S) {
        self.status = msg.into();
    }

    pub fn push_activity<S: AsRef<str>>(&mut self, msg: S) {
        for line in msg.as_ref().lines() {
            self.activity.push(line.to_string());
        }
        if self.activity.len() > MAX_ACTIVITY_LINES {
            let overflow = self.activity.len() - MAX_ACTIVITY_LINES;
            self.activity.drain(0..overflow);
        }
    }

    /// Pick up edits other processes made to the settings file
    pub fn reload(&mut self, force: bool) {
        if !force && self.last_reload.elapsed() < RELOAD_INTERVAL {
            return;
        }
        self.last_reload = Instant::now();
        if let Err(err) = self.store.reload() {
            self.set_status("Reload failed");
            self.push_activity(format!("reload error: {}", err));
        }
        for change in self.sync.take_external_changes() {
            self.log_external(change);
        }
    }

    fn log_external(&mut self, change: ExternalChange) {
        let line = match change {
            ExternalChange::Symbol(key, value) => format!("{} changed to {:?}", key, value),
            ExternalChange::Snapshot(group) => format!("{} snapshot replaced", group.title()),
        };
        self.push_activity(line);
    }

    /// Selector entries of a group: its presets, then Saved if a snapshot exists
    pub fn selector_entries(&self, group: KeyGroup) -> Vec<SelectorEntry> {
        let reconciler = self.sync.reconciler(group);
        let mut entries: Vec<SelectorEntry> =
            (0..reconciler.presets().len()).map(SelectorEntry::Preset).collect();
        if reconciler.has_snapshot() {
            entries.push(SelectorEntry::Saved);
        }
        entries
    }

    pub fn selector_label(&self, group: KeyGroup, entry: SelectorEntry) -> &'static str {
        match entry {
            SelectorEntry::Preset(index) => self.sync.reconciler(group).presets()[index].name,
            SelectorEntry::Saved => "Saved",
        }
    }

    pub fn next_group(&mut self) {
        self.group_index = (self.group_index + 1) % self.groups.len();
        self.row = 0;
    }

    pub fn previous_group(&mut self) {
        self.group_index = (self.group_index + self.groups.len() - 1) % self.groups.len();
        self.row = 0;
    }

    pub fn move_row(&mut self, down: bool) {
        let len = self.group().keys().len();
        self.row = if down {
            (self.row + 1).min(len - 1)
        } else {
            self.row.saturating_sub(1)
        };
    }

    /// Step the group's preset selector forward or backward
    pub fn cycle_preset(&mut self, forward: bool) {
        let group = self.group();
        let entries = self.selector_entries(group);
        if entries.is_empty() {
            return;
        }
        let position = match self.status_of(group).selection {
            PresetMatch::Preset(index) => entries.iter().position(|e| *e == SelectorEntry::Preset(index)),
            PresetMatch::Saved => entries.iter().position(|e| *e == SelectorEntry::Saved),
            PresetMatch::Custom => None,
        };
        let next = match (position, forward) {
            (Some(p), true) => (p + 1) % entries.len(),
            (Some(p), false) => (p + entries.len() - 1) % entries.len(),
            (None, true) => 0,
            (None, false) => entries.len() - 1,
        };
        let entry = entries[next];
        let choice = match entry {
            SelectorEntry::Preset(index) => PresetMatch::Preset(index),
            SelectorEntry::Saved => PresetMatch::Saved,
        };
        let label = self.selector_label(group, entry);
        let result = self.sync.select(&mut self.store, group, choice);
        self.report(result, format!("{}: {}", group.title(), label));
    }

    pub fn start_edit(&mut self) {
        self.edit_buffer = Some(self.sync.value(self.selected_key()));
    }

    pub fn cancel_edit(&mut self) {
        if self.edit_buffer.take().is_some() {
            self.set_status("Edit cancelled");
        }
    }

    pub fn commit_edit(&mut self) {
        let Some(value) = self.edit_buffer.take() else {
            return;
        };
        let key = self.selected_key();
        let result = self.sync.edit(&mut self.store, key, &value);
        self.report(result, format!("{} = {:?}", key, value));
    }

    pub fn type_char(&mut self, c: char) {
        if let Some(buffer) = self.edit_buffer.as_mut() {
            buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(buffer) = self.edit_buffer.as_mut() {
            buffer.pop();
        }
    }

    pub fn save_group(&mut self) {
        let group = self.group();
        let result = self.sync.save(&mut self.store, group);
        self.report(result, format!("Saved {} snapshot", group.title()));
    }

    pub fn restore_default(&mut self) {
        let key = self.selected_key();
        let result = self.sync.restore_default(&mut self.store, key);
        // The restore arrives through the store like any outside change
        for change in self.sync.take_external_changes() {
            match change {
                ExternalChange::Symbol(changed, _) if changed == key => {}
                other => self.log_external(other),
            }
        }
        self.report(result, format!("{} restored to {:?}", key, key.default_symbol()));
    }

    /// Apply `key=value` mapping lines, as printed by `keymods --print-symbols`
    pub fn import_mapping(&mut self, text: &str) {
        match self.sync.import(&mut self.store, text) {
            Ok(rejected) => {
                for err in &rejected {
                    self.push_activity(format!("import skipped: {}", err));
                }
                self.set_status(format!("Imported mapping, {} line(s) skipped", rejected.len()));
            }
            Err(err) => {
                self.set_status("Write failed, change kept in this window");
                self.push_activity(format!("write error: {}", err));
            }
        }
    }

    /// Indicator text with every modifier held, Shift latched and Caps Lock locked
    pub fn preview(&self) -> String {
        let mut table = SymbolTable::empty();
        for key in SymbolKey::iter() {
            table.set(key, &self.sync.value(key));
        }
        let layout = MaskLayout::X11;
        let all: Vec<ModifierIdentity> = ModifierIdentity::iter().collect();
        let state = TrackerState {
            raw: layout.mask_of(&all),
            latch: layout.mask_of(&[ModifierIdentity::Shift]),
            lock: layout.mask_of(&[ModifierIdentity::CapsLock]),
            ..Default::default()
        };
        compose(&layout, &state, &table)
    }

    fn report(&mut self, result: Result<GroupStatus, SettingsError>, done: String) {
        match result {
            Ok(status) => {
                let marker = if status.diverged { " (unsaved)" } else { "" };
                self.set_status(format!("{}{}", done, marker));
                self.push_activity(done);
            }
            Err(err) => {
                self.set_status("Write failed, change kept in this window");
                self.push_activity(format!("write error: {}", err));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_app(dir: &tempfile::TempDir) -> App {
        App::open(TomlStore::open(dir.path().join("settings.toml")).unwrap())
    }

    #[test]
    fn test_cycle_preset_wraps() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = open_app(&dir);
        assert_eq!(app.status_of(KeyGroup::Modifiers).selection, PresetMatch::Preset(0));

        app.cycle_preset(false);
        assert_eq!(app.status_of(KeyGroup::Modifiers).selection, PresetMatch::Preset(3));
        app.cycle_preset(true);
        assert_eq!(app.status_of(KeyGroup::Modifiers).selection, PresetMatch::Preset(0));
    }

    #[test]
    fn test_edit_and_save_adds_saved_entry() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = open_app(&dir);
        app.next_group();
        app.next_group();
        assert_eq!(app.group(), KeyGroup::Wrapper);

        app.start_edit();
        app.type_char('K');
        app.commit_edit();
        assert_eq!(app.status_of(KeyGroup::Wrapper).selection, PresetMatch::Custom);
        assert!(!app.selector_entries(KeyGroup::Wrapper).contains(&SelectorEntry::Saved));

        app.save_group();
        assert_eq!(app.status_of(KeyGroup::Wrapper).selection, PresetMatch::Saved);
        assert!(app.selector_entries(KeyGroup::Wrapper).contains(&SelectorEntry::Saved));
    }

    #[test]
    fn test_cancelled_edit_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = open_app(&dir);
        app.start_edit();
        app.backspace();
        app.cancel_edit();
        assert_eq!(app.sync.value(SymbolKey::Shift), "⇧");
        assert!(!dir.path().join("settings.toml").exists());
    }

    #[test]
    fn test_preview_shows_markers() {
        let dir = tempfile::tempdir().unwrap();
        let app = open_app(&dir);
        assert_eq!(app.preview(), "⇧'⇬◦⋀⌥①◆⌘⎇");
    }

    #[test]
    fn test_import_mapping_persists_and_reports() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = open_app(&dir);
        app.import_mapping("# exported\nopening=(\nclosing=)\nbogus\n");

        assert_eq!(app.sync.value(SymbolKey::Opening), "(");
        assert_eq!(app.status, "Imported mapping, 1 line(s) skipped");
        assert_eq!(app.activity, vec!["import skipped: line 4: expected key=value".to_string()]);

        let reopened = open_app(&dir);
        assert_eq!(reopened.sync.value(SymbolKey::Closing), ")");
    }

    #[test]
    fn test_restore_default_keeps_other_windows_changes() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = open_app(&dir);
        app.start_edit();
        app.type_char('!');
        app.commit_edit();

        // Another window writes after this one last reloaded
        let mut other = open_app(&dir);
        other.sync.edit(&mut other.store, SymbolKey::Icon, "K").unwrap();

        app.activity.clear();
        app.restore_default();
        assert_eq!(app.sync.value(SymbolKey::Shift), "⇧");
        assert_eq!(app.sync.value(SymbolKey::Icon), "K");
        assert_eq!(
            app.activity,
            vec![
                "icon changed to \"K\"".to_string(),
                "shift-symbol restored to \"⇧\"".to_string()
            ]
        );
    }

    #[test]
    fn test_reload_logs_external_edits() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = open_app(&dir);
        std::fs::write(dir.path().join("settings.toml"), "[symbols]\nicon = \"K\"\n").unwrap();
        app.reload(true);
        assert_eq!(app.sync.value(SymbolKey::Icon), "K");
        assert_eq!(app.activity, vec!["icon changed to \"K\"".to_string()]);
    }
}
