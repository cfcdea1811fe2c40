//! Valuation settings

use serde::{Deserialize, Serialize};

use crate::ledger::OversellPolicy;
use crate::returns::{CashFlowConvention, TerminalFlow};
use crate::valuation::Grouping;

/// Default number of NAV lookups in flight at once
pub const DEFAULT_PRICE_CONCURRENCY: usize = 8;

/// Knobs that change how a portfolio is valued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValuationSettings {
    pub oversell: OversellPolicy,
    pub grouping: Grouping,
    pub terminal_flow: TerminalFlow,
    pub cash_flow_convention: CashFlowConvention,
    pub price_concurrency: usize,
}

impl Default for ValuationSettings {
    fn default() -> Self {
        Self {
            oversell: OversellPolicy::default(),
            grouping: Grouping::default(),
            terminal_flow: TerminalFlow::default(),
            cash_flow_convention: CashFlowConvention::default(),
            price_concurrency: DEFAULT_PRICE_CONCURRENCY,
        }
    }
}

impl ValuationSettings {
    pub fn with_oversell(mut self, oversell: OversellPolicy) -> Self {
        self.oversell = oversell;
        self
    }

    pub fn with_grouping(mut self, grouping: Grouping) -> Self {
        self.grouping = grouping;
        self
    }

    pub fn with_terminal_flow(mut self, terminal_flow: TerminalFlow) -> Self {
        self.terminal_flow = terminal_flow;
        self
    }

    pub fn with_cash_flow_convention(mut self, convention: CashFlowConvention) -> Self {
        self.cash_flow_convention = convention;
        self
    }
}
