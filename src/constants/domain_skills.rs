use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct DomainSkills {
    pub domain: &'static str,
    pub skills: &'static [&'static str],
}

pub const DOMAIN_SKILLS: &[DomainSkills] = &[
    DomainSkills {
        domain: "Cloud Engineering",
        skills: &[
            "Linux", "AWS", "GCP", "Azure", "CI/CD", "Docker", "Kubernetes", "Terraform",
            "Networking", "Scripting",
        ],
    },
    DomainSkills {
        domain: "Data Science",
        skills: &[
            "Python", "Pandas", "Numpy", "Statistics", "Machine Learning", "SQL",
            "Data Visualization", "Scikit-learn",
        ],
    },
    DomainSkills {
        domain: "UI/UX Design",
        skills: &[
            "Figma", "Prototyping", "User Research", "Interaction Design", "Adobe XD",
            "Usability Testing", "Design Thinking",
        ],
    },
    DomainSkills {
        domain: "Cybersecurity",
        skills: &[
            "Network Security", "Linux", "Ethical Hacking", "Penetration Testing", "Firewalls",
            "SIEM", "Cryptography",
        ],
    },
];

/// Case-insensitive lookup by domain name.
pub fn find_domain(name: &str) -> Option<&'static DomainSkills> {
    let name = name.trim();
    DOMAIN_SKILLS
        .iter()
        .find(|entry| entry.domain.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_domain_ignores_case() {
        let entry = find_domain("  data science ").unwrap();
        assert_eq!(entry.domain, "Data Science");
        assert!(entry.skills.contains(&"Pandas"));
    }

    #[test]
    fn test_unknown_domain_is_none() {
        assert!(find_domain("Astrology").is_none());
    }
}
