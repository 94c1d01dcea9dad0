use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::action::Action;
use crate::app::{App, InputMode};
use crate::config::Config;
use crate::system::lifecycle::LifecycleAction;
use crate::system::process::{ProcessRecord, RunState};
use crate::ui::theme::Theme;
use crate::ui::{header, process_list, statusbar};

const TOTAL_MEMORY: u64 = 16 * 1024 * 1024 * 1024;

fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
    let area = buf.area;
    let mut out = String::new();
    for y in 0..area.height {
        for x in 0..area.width {
            let cell = buf.cell((x, y)).unwrap();
            out.push_str(cell.symbol());
        }
        if y + 1 < area.height {
            out.push('\n');
        }
    }
    out
}

fn render_to_string<F>(width: u16, height: u16, draw: F) -> String
where
    F: FnOnce(&mut ratatui::Frame),
{
    let backend = TestBackend::new(width, height);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(draw).unwrap();
    let buf = terminal.backend().buffer();
    buffer_to_string(buf)
}

fn make_record(pid: u32, dir: &str, cpu: f32, state: RunState) -> ProcessRecord {
    ProcessRecord {
        pid,
        ppid: 1,
        cpu_percent: cpu,
        mem_percent: 1.0,
        total_cpu_percent: cpu,
        total_mem_percent: 1.0,
        state,
        command: "claude".to_string(),
        args: String::new(),
        start_time: "Mon Jan  1 12:00:00 2024".to_string(),
        working_dir: dir.to_string(),
        descendants: vec![pid + 1, pid + 2],
    }
}

fn make_app(records: Vec<ProcessRecord>) -> App {
    let mut app = App::new(&Config::default(), TOTAL_MEMORY);
    app.apply_refresh(records);
    app
}

#[test]
fn list_shows_loading_before_first_refresh() {
    let app = App::new(&Config::default(), TOTAL_MEMORY);
    let out = render_to_string(100, 20, |f| crate::ui::draw(f, &app));
    assert!(out.contains("Loading processes..."));
}

#[test]
fn list_shows_empty_placeholder_after_refresh() {
    let app = make_app(vec![]);
    let out = render_to_string(100, 20, |f| crate::ui::draw(f, &app));
    assert!(out.contains("No Claude sessions found"));
    assert!(out.contains("Sessions: 0"));
}

#[test]
fn list_renders_one_row_per_session() {
    let theme = Theme::dark();
    let records = vec![
        make_record(101, "/home/dev/api", 12.5, RunState::Running),
        make_record(202, "/home/dev/web", 0.4, RunState::Paused),
    ];
    let out = render_to_string(120, 10, |f| {
        let area = f.area();
        process_list::render(f, area, &records, 0, false, TOTAL_MEMORY, &theme)
    });

    assert!(out.contains("PID"));
    assert!(out.contains("PROJECT"));
    assert!(out.contains("101"));
    assert!(out.contains("api"));
    assert!(out.contains("12.5%"));
    assert!(out.contains("running"));
    assert!(out.contains("202"));
    assert!(out.contains("paused"));
    assert!(out.contains("/home/dev/web"));
    // 1% of 16 GB
    assert!(out.contains("164MB"));
}

#[test]
fn header_shows_totals() {
    let theme = Theme::dark();
    let stats = header::HeaderStats {
        session_count: 3,
        total_cpu: 42.0,
        total_mem: 12.5,
        total_memory_bytes: TOTAL_MEMORY,
    };
    let out = render_to_string(80, 3, |f| {
        let area = f.area();
        header::render(f, area, &stats, &theme)
    });
    assert!(out.contains("clauditor"));
    assert!(out.contains("Sessions: 3"));
    assert!(out.contains("42.0%"));
    assert!(out.contains("2.0GB"));
}

#[test]
fn statusbar_prefers_status_message() {
    let theme = Theme::dark();
    let mut app = make_app(vec![]);
    app.apply_lifecycle_result(LifecycleAction::Terminate, 7, "api", true);
    let out = render_to_string(80, 1, |f| {
        let area = f.area();
        statusbar::render(
            f,
            area,
            InputMode::Normal,
            app.status_message.as_ref(),
            &theme,
        )
    });
    assert!(out.contains("Killed api (PID 7)"));
}

#[test]
fn statusbar_lists_normal_mode_keys() {
    let theme = Theme::dark();
    let out = render_to_string(100, 1, |f| {
        let area = f.area();
        statusbar::render(f, area, InputMode::Normal, None, &theme)
    });
    assert!(out.contains("Kill"));
    assert!(out.contains("Pause"));
    assert!(out.contains("Resume"));
    assert!(out.contains("Quit"));
}

#[test]
fn confirm_dialog_names_action_and_target() {
    let mut app = make_app(vec![make_record(4242, "/work/billing", 1.0, RunState::Running)]);
    app.dispatch(Action::Request(LifecycleAction::Terminate));
    assert_eq!(app.input_mode, InputMode::Confirm);

    let out = render_to_string(100, 20, |f| crate::ui::draw(f, &app));
    assert!(out.contains("Confirm kill"));
    assert!(out.contains("Kill billing (PID 4242)?"));
}

#[test]
fn help_overlay_lists_bindings() {
    let mut app = make_app(vec![]);
    app.dispatch(Action::ToggleHelp);
    let out = render_to_string(100, 24, |f| crate::ui::draw(f, &app));
    assert!(out.contains("Keybinds"));
    assert!(out.contains("Kill session tree"));
    assert!(out.contains("Resume session tree"));
}

#[test]
fn selection_bar_shows_selected_directory() {
    let app = make_app(vec![make_record(55, "/srv/repos/ledger", 1.0, RunState::Running)]);
    let out = render_to_string(100, 20, |f| crate::ui::draw(f, &app));
    assert!(out.contains("/srv/repos/ledger"));
    assert!(out.contains("PID 55"));
}
