//! `kiln help`: the task listing.

use owo_colors::OwoColorize;

use crate::cli::Task;

/// The listing as plain text, main tasks first.
pub fn listing() -> String {
    let width = Task::all().iter().map(|t| t.name().len()).max().unwrap_or(0);
    let mut out = String::from("Usage: kiln [OPTIONS] [TASK]\n");

    for (title, main) in [("Main Tasks", true), ("Sub Tasks", false)] {
        out.push_str(&format!("\n{}\n", title));
        for task in Task::all().iter().filter(|t| t.is_main() == main) {
            out.push_str(&format!(
                "    {:<width$}  {}\n",
                task.name(),
                task.description(),
                width = width
            ));
        }
    }
    out
}

pub fn execute() {
    for line in listing().lines() {
        if line == "Main Tasks" || line == "Sub Tasks" {
            println!("{}", line.bold());
        } else {
            println!("{}", line);
        }
    }
}
