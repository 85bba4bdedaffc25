use crate::model::{Cta, Insight, Status};

/// Built-in dataset used whenever no source can be read.
pub fn builtin_insights() -> Vec<Insight> {
    vec![Insight {
        id: "SMRT1".to_string(),
        content: "Interest rates can be unpredictable. But there are ways to access your equity without losing your current low mortgage rate.".to_string(),
        status: Status::Live,
        priority: 1,
        is_dynamic: false,
        has_cta: true,
        cta: Some(Cta {
            text: "See ways to access equity".to_string(),
            url: "https://www.hometap.com/blog/cash-out-refinance-vs-a-home-equity-loan/"
                .to_string(),
        }),
        required_context: vec!["SYSTEM".to_string()],
        requires_primary_user: false,
        requires_profile_complete: false,
        template_keys: Vec::new(),
    }]
}
