use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::{App, Field, Mode, TaskForm};
use crate::analytics::Summary;
use crate::task::{Priority, Task};

const HELP: &str =
    "a add  n quick add  e edit  space done  d delete  / search  s status  p priority  c category  x export  q quit";

pub(super) fn draw(f: &mut Frame, app: &App) {
    let [header, filters, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(5),
        Constraint::Length(2),
    ])
    .areas(f.area());
    let [list_area, stats_area] =
        Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)]).areas(body);

    let summary = app.board.summary();
    draw_progress(f, header, &summary);
    draw_filters(f, filters, app);
    draw_tasks(f, list_area, app);
    draw_stats(f, stats_area, &summary);
    draw_footer(f, footer, app);

    match &app.mode {
        Mode::Form(form) => draw_form(f, form),
        Mode::ConfirmDelete(id) => {
            let title = app.board.get(*id).map_or("", |t| t.title.as_str());
            draw_prompt(f, "Delete", &format!("Delete '{title}'? (y/n)"));
        }
        Mode::QuickAdd(text) => draw_prompt(f, "Quick add", &format!("{text}_")),
        Mode::Browse | Mode::Search => {}
    }
}

fn draw_progress(f: &mut Frame, area: Rect, summary: &Summary) {
    let progress = summary.progress;
    let gauge = Gauge::default()
        .block(Block::default().title("Simple To-Do").borders(Borders::ALL))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(progress.ratio())
        .label(format!("{}/{} tasks completed", progress.completed, progress.total));
    f.render_widget(gauge, area);
}

fn draw_filters(f: &mut Frame, area: Rect, app: &App) {
    let searching = app.mode == Mode::Search;
    let search = if searching {
        format!("{}_", app.criteria.search_text)
    } else {
        app.criteria.search_text.clone()
    };
    let line = Line::from(vec![
        Span::raw("Search: "),
        Span::styled(
            search,
            if searching {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            },
        ),
        Span::raw(format!(
            "   Status: {}   Priority: {}   Category: {}",
            app.criteria.status.label(),
            app.criteria.priority.label(),
            app.criteria.category.label()
        )),
    ]);
    let paragraph = Paragraph::new(line).block(Block::default().title("Filters").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}

fn draw_tasks(f: &mut Frame, area: Rect, app: &App) {
    let visible = app.visible();
    let items: Vec<ListItem> = visible.iter().map(|t| task_item(*t)).collect();
    let title = format!("{} task(s) shown", visible.len());

    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan))
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected((!visible.is_empty()).then_some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn task_item(task: &Task) -> ListItem<'_> {
    let check = if task.completed { "[x] " } else { "[ ] " };
    let title_style = if task.completed {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(Color::White)
    };
    let due = task
        .due_date
        .map(|d| d.format(" (Due: %b %d, %Y)").to_string())
        .unwrap_or_default();

    let mut lines = vec![Line::from(vec![
        Span::raw(check),
        Span::styled(&task.title, title_style),
        Span::raw(due),
        Span::raw("  "),
        Span::styled(task.priority.as_str(), priority_style(task.priority)),
        Span::raw(format!("  {}", task.category)),
        Span::styled(format!("  #{}", task.id.short()), Style::default().fg(Color::DarkGray)),
    ])];
    if !task.description.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("    {}", task.description),
            Style::default().fg(Color::Gray),
        )));
    }
    ListItem::new(lines)
}

fn priority_style(priority: Priority) -> Style {
    match priority {
        Priority::High => Style::default().fg(Color::Red),
        Priority::Medium => Style::default().fg(Color::Yellow),
        Priority::Low => Style::default().fg(Color::Green),
    }
}

fn draw_stats(f: &mut Frame, area: Rect, summary: &Summary) {
    let mut lines = vec![Line::from(Span::styled(
        "Categories",
        Style::default().add_modifier(Modifier::BOLD),
    ))];
    lines.extend(
        summary
            .categories
            .iter()
            .map(|(category, count)| Line::from(format!("  {category}: {count}"))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Completed per week",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if summary.weekly.is_empty() {
        lines.push(Line::from("  none yet"));
    }
    lines.extend(
        summary
            .weekly
            .iter()
            .map(|(week, count)| Line::from(format!("  {week}: {}", "#".repeat(*count)))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(match summary.average_completion_hours {
        Some(hours) => format!("Avg completion: {hours:.2} h"),
        None => "Avg completion: n/a".to_string(),
    }));

    let paragraph = Paragraph::new(lines)
        .block(Block::default().title("Analytics").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = Vec::with_capacity(2);
    if let Some(status) = &app.status {
        let style = if status.is_error {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Green)
        };
        lines.push(Line::from(Span::styled(status.text.as_str(), style)));
    }
    lines.push(Line::from(Span::styled(HELP, Style::default().fg(Color::DarkGray))));
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_form(f: &mut Frame, form: &TaskForm) {
    let area = centered(f.area(), 60, 13);
    let lines: Vec<Line> = [
        Field::Title,
        Field::Description,
        Field::Due,
        Field::Priority,
        Field::Category,
    ]
    .into_iter()
    .flat_map(|field| {
        let focused = form.focus == field;
        let marker = if focused { "> " } else { "  " };
        let value = match field {
            Field::Priority | Field::Category => format!("< {} >", form.value(field)),
            _ if focused => format!("{}_", form.value(field)),
            _ => form.value(field).to_string(),
        };
        let style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        };
        [
            Line::from(Span::styled(format!("{marker}{}", field.label()), style)),
            Line::from(format!("    {value}")),
        ]
    })
    .chain(std::iter::once(Line::from(Span::styled(
        "Tab next  Enter save  Esc cancel",
        Style::default().fg(Color::DarkGray),
    ))))
    .collect();

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines).block(Block::default().title(form.heading()).borders(Borders::ALL)),
        area,
    );
}

fn draw_prompt(f: &mut Frame, title: &str, text: &str) {
    let area = centered(f.area(), 60, 3);
    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text.to_string()).block(Block::default().title(title.to_string()).borders(Borders::ALL)),
        area,
    );
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
