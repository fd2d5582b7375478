use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    #[error("desired total must be a positive integer")]
    ZeroDesired,

    #[error("maximum per request must be a positive integer")]
    ZeroMaximum,
}

/// How one logical "get N records" request is split into capped-size API calls.
///
/// Every request asks for `records_per_request` records except request 0,
/// which asks for `records_per_request - first_request_deficit`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchPlan {
    pub request_count: usize,
    pub records_per_request: usize,
    pub first_request_deficit: usize,
}

impl FetchPlan {
    /// Size of request `index`, or `None` past the end of the plan.
    pub fn request_size(&self, index: usize) -> Option<usize> {
        if index >= self.request_count {
            return None;
        }
        if index == 0 {
            Some(self.records_per_request - self.first_request_deficit)
        } else {
            Some(self.records_per_request)
        }
    }

    pub fn request_sizes(&self) -> Vec<usize> {
        (0..self.request_count)
            .filter_map(|i| self.request_size(i))
            .collect()
    }

    pub fn total_requested(&self) -> usize {
        self.request_count * self.records_per_request - self.first_request_deficit
    }
}

// Three cases, checked in order. The uneven case picks `factor` requests and
// sizes them as evenly as possible; the shortfall is taken from request 0 only.
pub fn plan(desired_total: usize, max_per_request: usize) -> Result<FetchPlan, PlanError> {
    if desired_total == 0 {
        return Err(PlanError::ZeroDesired);
    }
    if max_per_request == 0 {
        return Err(PlanError::ZeroMaximum);
    }

    if desired_total <= max_per_request {
        return Ok(FetchPlan {
            request_count: 1,
            records_per_request: desired_total,
            first_request_deficit: 0,
        });
    }

    if desired_total % max_per_request == 0 {
        return Ok(FetchPlan {
            request_count: desired_total / max_per_request,
            records_per_request: max_per_request,
            first_request_deficit: 0,
        });
    }

    let factor = desired_total / max_per_request + 1;
    let records_per_request = desired_total.div_ceil(factor);
    Ok(FetchPlan {
        request_count: factor,
        records_per_request,
        first_request_deficit: records_per_request * factor - desired_total,
    })
}
