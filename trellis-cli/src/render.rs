//! Terminal renderer for the layered stack view.
//!
//! Renders the stack graph level by level: each stack as a boxed run of
//! commits (oldest at the bottom, matching how history grows upward), with
//! connection glyphs, parallel-group markers, divergence and conflict flags,
//! and optional size statistics.

use std::io::{self, Write};

use owo_colors::OwoColorize;
use trellis_core::commit::CommitGraph;
use trellis_core::divergence::DivergentChange;
use trellis_core::id::{CommitId, StackId};
use trellis_core::layout::StackLayout;
use trellis_core::parallel::ParallelGroup;
use trellis_core::stacks::{ConnectionKind, StackGraph};
use trellis_core::stats::StatsStore;
use unicode_width::UnicodeWidthChar;

/// Maximum display width of a commit summary before truncation.
const SUMMARY_WIDTH: usize = 60;

/// Renderer for the stack view
pub struct StackViewRenderer<'a> {
  commit_graph: &'a CommitGraph,
  stack_graph: &'a StackGraph,
  layout: &'a StackLayout,
  groups: &'a [ParallelGroup],
  divergent: &'a [DivergentChange],
  stats: Option<&'a StatsStore>,
}

impl<'a> StackViewRenderer<'a> {
  pub fn new(
    commit_graph: &'a CommitGraph,
    stack_graph: &'a StackGraph,
    layout: &'a StackLayout,
    groups: &'a [ParallelGroup],
    divergent: &'a [DivergentChange],
    stats: Option<&'a StatsStore>,
  ) -> Self {
    Self {
      commit_graph,
      stack_graph,
      layout,
      groups,
      divergent,
      stats,
    }
  }

  /// Render the full view: levels top to bottom, then the connection list.
  pub fn render(&self, writer: &mut impl Write) -> io::Result<()> {
    if self.stack_graph.is_empty() {
      writeln!(writer, "no commits")?;
      return Ok(());
    }

    for (level, stack_ids) in self.layout.levels().iter().enumerate() {
      writeln!(writer, "{}", format!("level {level}").bold().underline())?;
      for stack_id in stack_ids {
        self.render_stack(writer, *stack_id)?;
      }
      writeln!(writer)?;
    }

    self.render_connections(writer)?;
    Ok(())
  }

  fn render_stack(&self, writer: &mut impl Write, stack_id: StackId) -> io::Result<()> {
    let Some(stack) = self.stack_graph.stack(stack_id) else {
      return Ok(());
    };

    let mut header = format!("{} {} commit{}", stack_id, stack.len(), if stack.len() == 1 { "" } else { "s" });
    if let Some(stats) = self.stats {
      let total = stats.stack_total(stack);
      header.push_str(&format!(" {}{} {}{}", "+".green(), total.additions.green(), "-".red(), total.deletions.red()));
    }
    if let Some(group) = self.groups.iter().find(|group| group.contains(stack_id)) {
      header.push_str(&format!(" {}", format!("∥ group {}", group.id).cyan()));
    }
    writeln!(writer, "  {} {}", "●".bright_green(), header)?;

    // Newest commit first, so the stack reads downward into its base.
    for commit_id in stack.commits().iter().rev() {
      self.render_commit(writer, commit_id)?;
    }
    Ok(())
  }

  fn render_commit(&self, writer: &mut impl Write, commit_id: &CommitId) -> io::Result<()> {
    let Some(commit) = self.commit_graph.get(commit_id) else {
      return Ok(());
    };

    let short_id = &commit_id.as_str()[..commit_id.as_str().len().min(12)];
    let mut markers = String::new();
    if commit.has_conflicts {
      markers.push_str(&format!(" {}", "✗ conflict".red().bold()));
    }
    if self.is_divergent(commit_id) {
      markers.push_str(&format!(" {}", "◆ divergent".magenta()));
    }

    writeln!(
      writer,
      "  {} {} {}{}  {}",
      "│".bright_black(),
      short_id.yellow(),
      truncate_to_width(commit.summary(), SUMMARY_WIDTH),
      markers,
      commit.author.name.bright_black(),
    )
  }

  fn render_connections(&self, writer: &mut impl Write) -> io::Result<()> {
    if self.stack_graph.connections().is_empty() {
      return Ok(());
    }

    writeln!(writer, "{}", "connections".bold().underline())?;
    for connection in self.stack_graph.connections() {
      let kind = match connection.kind {
        ConnectionKind::Linear => "linear".to_string(),
        ConnectionKind::Branch => "branch".green().to_string(),
        ConnectionKind::Merge => "merge".blue().to_string(),
      };
      writeln!(writer, "  {} → {}  {}", connection.from, connection.to, kind)?;
    }
    Ok(())
  }

  fn is_divergent(&self, commit_id: &CommitId) -> bool {
    self
      .divergent
      .iter()
      .any(|change| change.commit_ids.iter().any(|id| id == commit_id))
  }
}

/// Truncate a string to a display width, appending an ellipsis when cut.
fn truncate_to_width(text: &str, max_width: usize) -> String {
  let mut width = 0;
  let mut truncated = String::new();
  for ch in text.chars() {
    let ch_width = ch.width().unwrap_or(0);
    if width + ch_width > max_width.saturating_sub(1) {
      truncated.push('…');
      return truncated;
    }
    width += ch_width;
    truncated.push(ch);
  }
  truncated
}

#[cfg(test)]
mod tests {
  use trellis_core::divergence::divergent_changes;
  use trellis_core::layout::StackLayout;
  use trellis_core::parallel::detect_parallel_groups;
  use trellis_core::stacks::StackGraph;
  use trellis_test_utils::graph::graph_from_edges;

  use super::*;

  fn render_to_string(commit_graph: &CommitGraph) -> String {
    let stack_graph = StackGraph::build(commit_graph);
    let layout = StackLayout::compute(&stack_graph);
    let groups = detect_parallel_groups(&stack_graph);
    let divergent = divergent_changes(commit_graph);

    let renderer = StackViewRenderer::new(commit_graph, &stack_graph, &layout, &groups, &divergent, None);
    let mut out = Vec::new();
    renderer.render(&mut out).unwrap();
    String::from_utf8(out).unwrap()
  }

  #[test]
  fn renders_levels_and_connections() {
    owo_colors::set_override(false);
    let commit_graph = graph_from_edges(&["a", "b", "c"], &[("a", "b"), ("a", "c")]);
    let output = render_to_string(&commit_graph);

    assert!(output.contains("level 0"));
    assert!(output.contains("level 1"));
    assert!(output.contains("connections"));
    assert!(output.contains("branch"));
    assert!(output.contains("∥ group 0"));
  }

  #[test]
  fn renders_empty_graph() {
    owo_colors::set_override(false);
    let commit_graph = CommitGraph::default();
    let output = render_to_string(&commit_graph);
    assert_eq!(output, "no commits\n");
  }

  #[test]
  fn truncates_wide_summaries() {
    let wide = "x".repeat(100);
    let truncated = truncate_to_width(&wide, 10);
    assert!(truncated.ends_with('…'));
    assert!(truncated.chars().count() <= 10);
  }
}
