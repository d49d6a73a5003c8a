use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageRequest {
    pub loan_amount: f64,
    #[serde(default = "default_interest_rate")]
    pub interest_rate: f64,
    #[serde(default = "default_loan_term")]
    pub loan_term: f64,
}

// Calculator defaults on the detail page: 15% over 25 years
fn default_interest_rate() -> f64 {
    15.0
}

fn default_loan_term() -> f64 {
    25.0
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MortgageResponse {
    pub monthly_payment: f64,
}

// Closed-form annuity payment: P * r * (1+r)^n / ((1+r)^n - 1) with the
// annual percentage rate converted to a monthly fraction. Invalid or
// non-positive inputs yield 0, the calculator shows ₦0 for them.
pub fn monthly_payment(loan_amount: f64, interest_rate: f64, loan_term_years: f64) -> f64 {
    let principal = loan_amount;
    let rate = interest_rate / 100.0 / 12.0;
    let payments = loan_term_years * 12.0;

    if !principal.is_finite() || principal <= 0.0 {
        return 0.0;
    }
    if !rate.is_finite() || rate <= 0.0 {
        return 0.0;
    }
    if !payments.is_finite() || payments <= 0.0 {
        return 0.0;
    }

    let growth = (1.0 + rate).powf(payments);
    let payment = principal * rate * growth / (growth - 1.0);
    // Extreme terms overflow growth to infinity and the ratio to NaN
    if payment.is_finite() {
        payment
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_fixture_value() {
        // 100,000 at 12% over 30 years is the textbook 1,028.61/month
        let payment = monthly_payment(100_000.0, 12.0, 30.0);
        assert!((payment - 1028.61).abs() < 0.01, "got {}", payment);
    }

    #[test]
    fn defaults_match_the_calculator() {
        let request: MortgageRequest =
            serde_json::from_str(r#"{"loanAmount": 42500000}"#).unwrap();
        assert_eq!(request.interest_rate, 15.0);
        assert_eq!(request.loan_term, 25.0);
        let payment = monthly_payment(request.loan_amount, request.interest_rate, request.loan_term);
        assert!(payment > 0.0);
    }

    #[test]
    fn invalid_inputs_yield_zero() {
        assert_eq!(monthly_payment(0.0, 15.0, 25.0), 0.0);
        assert_eq!(monthly_payment(-100.0, 15.0, 25.0), 0.0);
        assert_eq!(monthly_payment(100_000.0, 0.0, 25.0), 0.0);
        assert_eq!(monthly_payment(100_000.0, 15.0, 0.0), 0.0);
        assert_eq!(monthly_payment(f64::NAN, 15.0, 25.0), 0.0);
    }

    #[test]
    fn extreme_term_yields_zero_not_nan() {
        // growth becomes infinite, inf/inf would be NaN without the guard
        let payment = monthly_payment(100_000.0, 15.0, 1e15);
        assert_eq!(payment, 0.0);
    }

    #[test]
    fn higher_rate_costs_more_per_month() {
        let low = monthly_payment(10_000_000.0, 10.0, 25.0);
        let high = monthly_payment(10_000_000.0, 20.0, 25.0);
        assert!(high > low);
    }
}
