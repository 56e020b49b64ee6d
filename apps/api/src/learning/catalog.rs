//! Curated static catalog of certifications and opportunities.
//!
//! Served verbatim by the details endpoint and as the degraded-mode answer
//! when live learning-resource discovery fails.

use std::str::FromStr;

use serde::Serialize;

use crate::learning::models::{Course, LearningResult, Opportunity};

pub const FALLBACK_MESSAGE: &str = "Live course search is unavailable right now. \
    Showing curated recommendations instead.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogCertification {
    pub name: &'static str,
    pub provider: &'static str,
    pub cost: &'static str,
    pub length: &'static str,
    pub link: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CatalogOpportunity {
    pub name: &'static str,
    pub link: &'static str,
    pub difficulty: &'static str,
    pub description: &'static str,
}

pub const CERTIFICATIONS: &[CatalogCertification] = &[
    CatalogCertification {
        name: "Google IT Support Professional Certificate",
        provider: "Coursera / Google",
        cost: "$49/month (Coursera subscription)",
        length: "3–6 months",
        link: "https://www.coursera.org/professional-certificates/google-it-support",
    },
    CatalogCertification {
        name: "Google Data Analytics Professional Certificate",
        provider: "Coursera / Google",
        cost: "$49/month (Coursera subscription)",
        length: "6 months",
        link: "https://www.coursera.org/professional-certificates/google-data-analytics",
    },
    CatalogCertification {
        name: "Google Cybersecurity Professional Certificate",
        provider: "Coursera / Google",
        cost: "$49/month (Coursera subscription)",
        length: "6 months",
        link: "https://www.coursera.org/professional-certificates/google-cybersecurity",
    },
    CatalogCertification {
        name: "AWS Cloud Practitioner Essentials",
        provider: "AWS Skill Builder",
        cost: "Free (course), exam ~$100",
        length: "20+ hours",
        link: "https://www.aws.training/Details/Curriculum?id=20685",
    },
    CatalogCertification {
        name: "IBM Data Science Professional Certificate",
        provider: "Coursera / IBM",
        cost: "$49/month (Coursera subscription)",
        length: "6–9 months",
        link: "https://www.coursera.org/professional-certificates/ibm-data-science",
    },
    CatalogCertification {
        name: "The Complete Python Bootcamp",
        provider: "Udemy",
        cost: "Varies (often ~$15–$20 on sale)",
        length: "22+ hours video",
        link: "https://www.udemy.com/course/complete-python-bootcamp/",
    },
];

pub const OPPORTUNITIES: &[CatalogOpportunity] = &[
    CatalogOpportunity {
        name: "Major League Hacking Hackathons",
        link: "https://mlh.io",
        difficulty: "Beginner-friendly",
        description: "Hands-on real project exposure.",
    },
    CatalogOpportunity {
        name: "Kaggle Competitions",
        link: "https://www.kaggle.com/competitions",
        difficulty: "Beginner to advanced",
        description: "Data science and ML challenges with real datasets.",
    },
    CatalogOpportunity {
        name: "Google Summer of Code (open-source)",
        link: "https://summerofcode.withgoogle.com/",
        difficulty: "Intermediate",
        description: "Paid open-source contributions with real-world mentorship.",
    },
    CatalogOpportunity {
        name: "Hack The Box (Cybersecurity Labs)",
        link: "https://www.hackthebox.com/",
        difficulty: "Intermediate",
        description: "Hands-on penetration testing labs and challenges.",
    },
];

/// Which slice of the catalog the details endpoint should return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogKind {
    Certifications,
    Opportunities,
}

impl FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "certifications" => Ok(CatalogKind::Certifications),
            "opportunities" => Ok(CatalogKind::Opportunities),
            other => Err(format!(
                "unknown recommendation type '{other}', expected 'certifications' or 'opportunities'"
            )),
        }
    }
}

pub fn catalog_slice(kind: CatalogKind) -> serde_json::Value {
    // Serializing &'static str structs cannot fail.
    match kind {
        CatalogKind::Certifications => serde_json::to_value(CERTIFICATIONS),
        CatalogKind::Opportunities => serde_json::to_value(OPPORTUNITIES),
    }
    .unwrap_or_default()
}

/// The degraded-mode learning result: catalog contents, no sources, flagged.
pub fn static_learning_catalog() -> LearningResult {
    LearningResult {
        courses: CERTIFICATIONS
            .iter()
            .map(|c| Course {
                title: c.name.to_string(),
                provider: c.provider.to_string(),
                link: c.link.to_string(),
                cost: Some(c.cost.to_string()),
                duration: Some(c.length.to_string()),
                level: None,
            })
            .collect(),
        opportunities: OPPORTUNITIES
            .iter()
            .map(|o| Opportunity {
                name: o.name.to_string(),
                description: Some(o.description.to_string()),
                link: o.link.to_string(),
                difficulty: Some(o.difficulty.to_string()),
            })
            .collect(),
        sources: Vec::new(),
        fallback: true,
        message: Some(FALLBACK_MESSAGE.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_mirrors_catalog() {
        let result = static_learning_catalog();
        assert!(result.fallback);
        assert!(result.sources.is_empty());
        assert_eq!(result.message.as_deref(), Some(FALLBACK_MESSAGE));
        assert_eq!(result.courses.len(), CERTIFICATIONS.len());
        assert_eq!(result.opportunities.len(), OPPORTUNITIES.len());
        assert_eq!(result.courses[3].title, "AWS Cloud Practitioner Essentials");
        assert_eq!(result.courses[3].duration.as_deref(), Some("20+ hours"));
        assert!(result.courses.iter().all(Course::is_complete));
        assert!(result.opportunities.iter().all(Opportunity::is_complete));
    }

    #[test]
    fn test_fallback_is_deterministic() {
        assert_eq!(static_learning_catalog(), static_learning_catalog());
    }

    #[test]
    fn test_catalog_kind_parsing() {
        assert_eq!(
            "certifications".parse::<CatalogKind>(),
            Ok(CatalogKind::Certifications)
        );
        assert_eq!(
            " Opportunities ".parse::<CatalogKind>(),
            Ok(CatalogKind::Opportunities)
        );
        assert!("bogus".parse::<CatalogKind>().is_err());
        assert!("".parse::<CatalogKind>().is_err());
    }

    #[test]
    fn test_catalog_slice_uses_source_field_names() {
        let certs = catalog_slice(CatalogKind::Certifications);
        assert_eq!(certs.as_array().unwrap().len(), 6);
        assert_eq!(certs[0]["length"], "3–6 months");

        let opportunities = catalog_slice(CatalogKind::Opportunities);
        assert_eq!(opportunities[1]["name"], "Kaggle Competitions");
    }
}
