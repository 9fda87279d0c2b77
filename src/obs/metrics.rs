// self
use crate::obs::CallOutcome;

/// Records an operation call outcome via the global metrics recorder (when enabled).
pub fn record_call_outcome(operation: &str, outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oblio_client_call_total",
			"operation" => operation.to_owned(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (operation, outcome);
	}
}

/// Records a token exchange outcome via the global metrics recorder (when enabled).
pub fn record_token_exchange(outcome: CallOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oblio_client_token_exchange_total", "outcome" => outcome.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn recorders_noop_without_metrics() {
		record_call_outcome("getCompanies", CallOutcome::Failure);
		record_token_exchange(CallOutcome::Attempt);
	}
}
