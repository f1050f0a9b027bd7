//! Net demand computation.

/// Demand left after the battery acts.
///
/// Both inputs follow the load convention (positive = drawn, negative =
/// surplus), so the battery's contribution is a plain sum with **no sign
/// flipping**: a discharge (negative power) reduces demand, a charge
/// (positive power) absorbs surplus.
pub fn net_demand_kw(demand_kw: f64, battery_kw: f64) -> f64 {
    demand_kw + battery_kw
}

/// Site demand seen by the battery once PV generation is subtracted.
///
/// `pv_output_kw` is a positive generation figure, as returned by
/// [`crate::devices::PvArray::output_kw`].
pub fn site_demand_kw(load_kw: f64, pv_output_kw: f64) -> f64 {
    load_kw - pv_output_kw
}

/// Applies [`site_demand_kw`] element-wise.
///
/// Returns `None` when the profiles have different lengths.
pub fn site_demand_profile(load_kw: &[f64], pv_output_kw: &[f64]) -> Option<Vec<f64>> {
    if load_kw.len() != pv_output_kw.len() {
        return None;
    }
    Some(
        load_kw
            .iter()
            .zip(pv_output_kw)
            .map(|(&load, &pv)| site_demand_kw(load, pv))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discharge_reduces_demand() {
        assert_eq!(net_demand_kw(5.0, -3.0), 2.0);
    }

    #[test]
    fn charge_absorbs_surplus() {
        assert_eq!(net_demand_kw(-8.0, 8.0), 0.0);
    }

    #[test]
    fn pv_turns_load_into_surplus() {
        assert_eq!(site_demand_kw(1.0, 3.0), -2.0);
    }

    #[test]
    fn profile_lengths_must_match() {
        assert_eq!(
            site_demand_profile(&[1.0, 2.0], &[0.5, 3.0]),
            Some(vec![0.5, -1.0])
        );
        assert_eq!(site_demand_profile(&[1.0], &[]), None);
    }
}
