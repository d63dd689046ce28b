//! Print / Export
//!
//! Renders the current successful dataset as a Markdown document and writes
//! it next to the working directory. Pure environment delegation: exporting
//! never touches acquisition or selection state.

use std::io;
use std::path::Path;

use crate::model::Timeline;

/// Default export file name
pub const EXPORT_FILE: &str = "jurisprudence-timeline.md";

/// Render the full timeline as Markdown, figures in dataset order
pub fn render_markdown(timeline: &Timeline) -> String {
    let mut out = String::new();
    out.push_str("# 法哲学史 Jurisprudence Timeline\n\n");
    out.push_str("> “法学是关于神事和人事的事情的知识，是正义和非正义的科学。”\n");
    out.push_str("> — 查士丁尼《法学阶梯》\n");

    for figure in &timeline.philosophers {
        out.push_str(&format!("\n## {} ({})\n\n", figure.name, figure.years));
        out.push_str(&format!("*{}*\n\n", figure.school_of_thought));
        out.push_str(&format!("![{}]({})\n\n", figure.name, figure.portrait_url()));
        out.push_str(&format!("{}\n\n", figure.short_summary));

        out.push_str("### 理论核心 (Core Theory)\n\n");
        out.push_str(&format!("{}\n\n", figure.detailed_theory));

        if !figure.major_works.is_empty() {
            out.push_str("### 代表著作 (Major Works)\n\n");
            for work in &figure.major_works {
                out.push_str(&format!("- *{work}*\n"));
            }
            out.push('\n');
        }

        if !figure.key_quotes.is_empty() {
            out.push_str("### 名言 (Key Quotes)\n\n");
            for quote in &figure.key_quotes {
                out.push_str(&format!("> “{quote}”\n"));
            }
        }
    }

    out
}

/// Write the Markdown rendering to `path`
pub fn write_export(timeline: &Timeline, path: &Path) -> io::Result<()> {
    std::fs::write(path, render_markdown(timeline))
}
