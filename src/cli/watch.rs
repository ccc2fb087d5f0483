//! Interactive session: reads edits from stdin and re-renders as loads complete.

use super::{panel, ui};
use crate::core::{LookbackPeriod, RateProvider, Selection};
use crate::dashboard::{Applied, CatalogState, Dashboard};
use anyhow::{Result, anyhow, bail};
use std::str::FromStr;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  amount <value>     set the amount to convert
  from <code>        set the source currency
  to <code>          set the target currency
  swap               exchange source and target
  period <1W|1M|1Y>  set the trend lookback
  show               redraw the dashboard
  help               show this help
  quit               leave";

#[derive(Debug, Clone, PartialEq)]
pub enum WatchCommand {
    Amount(String),
    From(String),
    To(String),
    Swap,
    Period(LookbackPeriod),
    Show,
    Help,
    Quit,
}

impl FromStr for WatchCommand {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (verb, arg) = match s.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, arg.trim()),
            None => (s, ""),
        };
        let require = |what: &str| {
            if arg.is_empty() {
                Err(anyhow!("Missing {} for '{}'", what, verb))
            } else {
                Ok(arg.to_string())
            }
        };

        match verb.to_lowercase().as_str() {
            "amount" | "a" => Ok(WatchCommand::Amount(require("value")?)),
            "from" | "f" => Ok(WatchCommand::From(require("currency code")?)),
            "to" | "t" => Ok(WatchCommand::To(require("currency code")?)),
            "swap" | "s" => Ok(WatchCommand::Swap),
            "period" | "p" => Ok(WatchCommand::Period(require("period")?.parse()?)),
            "show" => Ok(WatchCommand::Show),
            "help" | "?" => Ok(WatchCommand::Help),
            "quit" | "exit" | "q" => Ok(WatchCommand::Quit),
            _ => Err(anyhow!("Unknown command: {}", verb)),
        }
    }
}

/// Applies an edit to the dashboard. Edits wait for the currency list.
pub fn execute(dashboard: &mut Dashboard, command: WatchCommand) -> Result<()> {
    if matches!(
        command,
        WatchCommand::Show | WatchCommand::Help | WatchCommand::Quit
    ) {
        return Ok(());
    }
    match dashboard.catalog() {
        CatalogState::Ready(_) => {}
        CatalogState::Loading => bail!("Currency list is still loading"),
        CatalogState::Failed(e) => bail!("Currency list unavailable: {}", e),
    }

    match command {
        WatchCommand::Amount(text) => dashboard.set_amount(&text),
        WatchCommand::From(code) => dashboard.set_source(&code)?,
        WatchCommand::To(code) => dashboard.set_target(&code)?,
        WatchCommand::Swap => dashboard.swap(),
        WatchCommand::Period(period) => dashboard.set_period(period),
        WatchCommand::Show | WatchCommand::Help | WatchCommand::Quit => {}
    }
    Ok(())
}

/// Tracks applied loads that haven't been drawn yet.
///
/// A batch is drawn once nothing is in flight, even when the last
/// completion to land was a discarded stale one.
#[derive(Debug, Default)]
pub struct RedrawTracker {
    dirty: bool,
}

impl RedrawTracker {
    /// Records a completion. Returns true when the screen should be redrawn.
    pub fn record(&mut self, applied: Applied, pending: bool) -> bool {
        if !matches!(applied, Applied::Discarded(_)) {
            self.dirty = true;
        }
        if self.dirty && !pending {
            self.dirty = false;
            return true;
        }
        false
    }

    /// Marks the current state as drawn.
    pub fn clear(&mut self) {
        self.dirty = false;
    }
}

fn redraw(dashboard: &Dashboard) {
    ui::print_separator();
    println!("{}", panel::render(dashboard));
}

pub async fn run(provider: Arc<dyn RateProvider>, selection: Selection) -> Result<()> {
    let mut dashboard = Dashboard::new(provider, selection);
    dashboard.start();

    println!("{HELP}");
    redraw(&dashboard);

    let mut tracker = RedrawTracker::default();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<WatchCommand>() {
                    Ok(WatchCommand::Quit) => break,
                    Ok(WatchCommand::Help) => println!("{HELP}"),
                    Ok(command) => match execute(&mut dashboard, command) {
                        Ok(()) => {
                            tracker.clear();
                            redraw(&dashboard);
                        }
                        Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
                    },
                    Err(e) => println!("{}", ui::style_text(&e.to_string(), ui::StyleType::Error)),
                }
            }
            Some(applied) = dashboard.next_event(), if dashboard.has_pending() => {
                debug!(?applied, "Load completed");
                if tracker.record(applied, dashboard.has_pending()) {
                    redraw(&dashboard);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            "amount 250.5".parse::<WatchCommand>().unwrap(),
            WatchCommand::Amount("250.5".to_string())
        );
        assert_eq!(
            "  FROM eur ".parse::<WatchCommand>().unwrap(),
            WatchCommand::From("eur".to_string())
        );
        assert_eq!(
            "t jpy".parse::<WatchCommand>().unwrap(),
            WatchCommand::To("jpy".to_string())
        );
        assert_eq!("swap".parse::<WatchCommand>().unwrap(), WatchCommand::Swap);
        assert_eq!(
            "period 1y".parse::<WatchCommand>().unwrap(),
            WatchCommand::Period(LookbackPeriod::Year)
        );
        assert_eq!("q".parse::<WatchCommand>().unwrap(), WatchCommand::Quit);
    }

    #[test]
    fn test_redraw_after_stale_completions_land_last() {
        use crate::dashboard::LoadKind;

        let mut tracker = RedrawTracker::default();
        let events = [
            (Applied::Catalog, true),
            (Applied::Rate, true),
            (Applied::History, true),
            (Applied::Discarded(LoadKind::Rate), true),
            (Applied::Discarded(LoadKind::History), false),
        ];
        let redraws: Vec<bool> = events
            .into_iter()
            .map(|(applied, pending)| tracker.record(applied, pending))
            .collect();
        assert_eq!(redraws, vec![false, false, false, false, true]);
    }

    #[test]
    fn test_no_redraw_for_stale_only_batch() {
        use crate::dashboard::LoadKind;

        let mut tracker = RedrawTracker::default();
        assert!(tracker.record(Applied::Rate, false));
        assert!(!tracker.record(Applied::Discarded(LoadKind::Rate), false));

        assert!(!tracker.record(Applied::History, true));
        tracker.clear();
        assert!(!tracker.record(Applied::Discarded(LoadKind::History), false));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "from".parse::<WatchCommand>().unwrap_err().to_string(),
            "Missing currency code for 'from'"
        );
        assert!("period 5D".parse::<WatchCommand>().is_err());
        assert_eq!(
            "convert".parse::<WatchCommand>().unwrap_err().to_string(),
            "Unknown command: convert"
        );
    }
}
