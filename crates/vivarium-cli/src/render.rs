use anstyle::{AnsiColor, Color, Style};
use vivarium_core::ActionPlan;

const WARN_STYLE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow)));
const OP_STYLE: Style = Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan)));

pub fn print_warning(message: &str) {
    eprintln!(
        "{}warning{}: {message}",
        WARN_STYLE.render(),
        WARN_STYLE.render_reset()
    );
}

pub fn plan_lines(plan: &ActionPlan) -> Vec<String> {
    if plan.is_empty() {
        return vec!["Nothing to do.".to_string()];
    }

    let mut lines = Vec::new();
    for (op, dists) in plan.ops_in_order() {
        for dist in dists {
            lines.push(format!(
                "{}{:<16}{} {dist}",
                OP_STYLE.render(),
                op.as_str(),
                OP_STYLE.render_reset()
            ));
        }
    }
    lines
}
