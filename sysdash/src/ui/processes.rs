//! Process table with per-row highlight, sort indicator, and a selection cursor.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
};

use crate::sink::ViewCommand;
use crate::ui::theme::{highlight_style, DIM, TABLE_HEADER};
use crate::ui::util::inner;
use crate::ui::Dashboard;
use crate::view::ProcessSort;

/// Rows moved by PageUp/PageDown.
pub const PAGE: isize = 10;

const COLS: [Constraint; 6] = [
    Constraint::Length(8),      // PID
    Constraint::Percentage(40), // Name
    Constraint::Length(8),      // CPU %
    Constraint::Length(8),      // Mem %
    Constraint::Length(11),     // State
    Constraint::Length(5),      // Pri
];

pub fn draw_processes(f: &mut ratatui::Frame<'_>, area: Rect, d: &mut Dashboard) {
    let total_rows = d.rows.len();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Processes ({total_rows} total)"));
    f.render_widget(block, area);

    let content = inner(area);
    if content.height < 2 {
        return;
    }

    let rows: Vec<Row> = d
        .rows
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.pid.to_string()).style(Style::default().fg(DIM)),
                Cell::from(p.name.clone()),
                Cell::from(format!("{:>7}", p.cpu)),
                Cell::from(format!("{:>7}", p.memory)),
                Cell::from(p.state.clone()),
                Cell::from(p.priority.to_string()),
            ])
            .style(highlight_style(p.highlight))
        })
        .collect();

    // Header with sort indicator
    let cpu_hdr = match d.sort {
        ProcessSort::CpuDesc => "CPU % •",
        _ => "CPU %",
    };
    let mem_hdr = match d.sort {
        ProcessSort::MemDesc => "Mem % •",
        _ => "Mem %",
    };
    let header = Row::new(vec!["PID", "Name", cpu_hdr, mem_hdr, "State", "Pri"]).style(
        Style::default()
            .fg(TABLE_HEADER)
            .add_modifier(Modifier::BOLD),
    );

    // rows can shrink between snapshots; keep the cursor on a real row
    let selected = d.table.selected().map(|i| i.min(total_rows.saturating_sub(1)));
    d.table.select(if total_rows == 0 { None } else { selected.or(Some(0)) });

    let table = Table::new(rows, COLS.to_vec())
        .header(header)
        .column_spacing(1)
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    // the state keeps its offset between draws so the viewport follows the cursor
    f.render_stateful_widget(table, content, &mut d.table);
}

/// Move the selected row; clamped to the rows currently shown.
pub fn move_selection(state: &mut TableState, cmd: ViewCommand, total_rows: usize) {
    if total_rows == 0 {
        state.select(None);
        return;
    }
    let last = total_rows - 1;
    let cur = state.selected().unwrap_or(0).min(last);
    let next = match cmd {
        ViewCommand::SelectBy(n) => cur.saturating_add_signed(n).min(last),
        ViewCommand::SelectFirst => 0,
        ViewCommand::SelectLast => last,
        ViewCommand::ToggleHelp => cur,
    };
    state.select(Some(next));
}
