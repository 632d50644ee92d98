//! Static skill taxonomy: canonical skill names with their category and subcategory

use crate::error::{Result, SkillMatcherError};
use crate::processing::text_processor::normalize_phrase;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillCategory {
    Technical,
    Soft,
}

/// Closed set of subcategory tags; each one belongs to exactly one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subcategory {
    ProgrammingLanguages,
    Frameworks,
    Tools,
    Databases,
    Devops,
    Testing,
    MobileDevelopment,
    DataAndAi,
    Cybersecurity,
    Other,
    Communication,
    Leadership,
    ProblemSolving,
    Collaboration,
    Adaptability,
    Organization,
    GrowthMindset,
    EthicsAndProfessionalism,
}

impl Subcategory {
    pub const ALL: [Subcategory; 18] = [
        Subcategory::ProgrammingLanguages,
        Subcategory::Frameworks,
        Subcategory::Tools,
        Subcategory::Databases,
        Subcategory::Devops,
        Subcategory::Testing,
        Subcategory::MobileDevelopment,
        Subcategory::DataAndAi,
        Subcategory::Cybersecurity,
        Subcategory::Other,
        Subcategory::Communication,
        Subcategory::Leadership,
        Subcategory::ProblemSolving,
        Subcategory::Collaboration,
        Subcategory::Adaptability,
        Subcategory::Organization,
        Subcategory::GrowthMindset,
        Subcategory::EthicsAndProfessionalism,
    ];

    pub fn category(self) -> SkillCategory {
        match self {
            Subcategory::ProgrammingLanguages
            | Subcategory::Frameworks
            | Subcategory::Tools
            | Subcategory::Databases
            | Subcategory::Devops
            | Subcategory::Testing
            | Subcategory::MobileDevelopment
            | Subcategory::DataAndAi
            | Subcategory::Cybersecurity
            | Subcategory::Other => SkillCategory::Technical,
            _ => SkillCategory::Soft,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Subcategory::ProgrammingLanguages => "programming_languages",
            Subcategory::Frameworks => "frameworks",
            Subcategory::Tools => "tools",
            Subcategory::Databases => "databases",
            Subcategory::Devops => "devops",
            Subcategory::Testing => "testing",
            Subcategory::MobileDevelopment => "mobile_development",
            Subcategory::DataAndAi => "data_and_ai",
            Subcategory::Cybersecurity => "cybersecurity",
            Subcategory::Other => "other",
            Subcategory::Communication => "communication",
            Subcategory::Leadership => "leadership",
            Subcategory::ProblemSolving => "problem_solving",
            Subcategory::Collaboration => "collaboration",
            Subcategory::Adaptability => "adaptability",
            Subcategory::Organization => "organization",
            Subcategory::GrowthMindset => "growth_mindset",
            Subcategory::EthicsAndProfessionalism => "ethics_and_professionalism",
        }
    }
}

impl FromStr for Subcategory {
    type Err = SkillMatcherError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase().replace(['-', ' '], "_");
        Subcategory::ALL
            .iter()
            .copied()
            .find(|sub| sub.tag() == wanted)
            .ok_or_else(|| SkillMatcherError::InvalidInput(format!("Unknown skill subcategory: {}", s)))
    }
}

impl FromStr for SkillCategory {
    type Err = SkillMatcherError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "technical" => Ok(SkillCategory::Technical),
            "soft" => Ok(SkillCategory::Soft),
            other => Err(SkillMatcherError::InvalidInput(format!("Unknown skill category: {}", other))),
        }
    }
}

impl fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillCategory::Technical => write!(f, "technical"),
            SkillCategory::Soft => write!(f, "soft"),
        }
    }
}

impl fmt::Display for Subcategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub name: String,
    pub category: SkillCategory,
    pub subcategory: Subcategory,
}

impl SkillDefinition {
    /// Build a definition, rejecting a subcategory that belongs to another category
    pub fn new(name: impl Into<String>, category: SkillCategory, subcategory: Subcategory) -> Result<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(SkillMatcherError::InvalidInput("Skill name must not be empty".to_string()));
        }
        if subcategory.category() != category {
            return Err(SkillMatcherError::InvalidInput(format!(
                "Subcategory '{}' does not belong to category '{}'",
                subcategory, category
            )));
        }
        Ok(Self { name, category, subcategory })
    }

    /// A skill that is not in the taxonomy but was still recognized
    pub fn synthesized(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: SkillCategory::Technical,
            subcategory: Subcategory::Other,
        }
    }

    fn from_taxonomy(name: &str, subcategory: Subcategory) -> Self {
        Self {
            name: name.to_string(),
            category: subcategory.category(),
            subcategory,
        }
    }

    /// Lookup key: the lower-cased name
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Strip parenthetical qualifiers: "Infrastructure as Code (IaC)" -> "Infrastructure as Code"
pub fn base_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0usize;
    for ch in name.chars() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

const TAXONOMY: &[(Subcategory, &[&str])] = &[
    (Subcategory::ProgrammingLanguages, &[
        "Python", "Java", "JavaScript", "C++", "C#", "Ruby", "Go", "PHP", "Swift", "Kotlin",
        "TypeScript", "Rust", "Scala", "R", "Perl", "Shell", "MATLAB", "SQL", "Lua",
    ]),
    (Subcategory::Frameworks, &[
        "React", "Angular", "Vue", "Svelte", "Next.js", "Nuxt.js", "Django", "Flask", "FastAPI",
        "Spring", "Express", "NestJS", "Laravel", "Ruby on Rails", "ASP.NET Core",
        "TensorFlow", "PyTorch", "Scikit-learn", "Pandas", "NumPy", "OpenCV", "Hugging Face Transformers",
    ]),
    (Subcategory::Tools, &[
        "Git", "GitHub", "GitLab", "Docker", "Kubernetes", "Jenkins", "CircleCI", "TravisCI",
        "JIRA", "Confluence", "Postman", "Insomnia", "Swagger", "Notion",
        "AWS", "Azure", "GCP", "Firebase", "Netlify", "Vercel", "Heroku",
        "VS Code", "IntelliJ IDEA", "PyCharm", "Eclipse", "Xcode",
        "Photoshop", "Figma", "Sketch", "Illustrator", "Canva",
    ]),
    (Subcategory::Databases, &[
        "PostgreSQL", "MySQL", "SQLite", "MongoDB", "Redis", "Cassandra", "DynamoDB", "Oracle",
    ]),
    (Subcategory::Devops, &[
        "CI/CD", "Infrastructure as Code (IaC)", "Terraform", "Ansible", "Prometheus", "Grafana",
        "New Relic", "ELK Stack", "Logstash", "Splunk",
    ]),
    (Subcategory::Testing, &[
        "JUnit", "Selenium", "Cypress", "Mocha", "Jest", "Pytest", "TestNG", "Postman Tests",
    ]),
    (Subcategory::MobileDevelopment, &[
        "Flutter", "React Native", "SwiftUI", "Xamarin", "Ionic",
    ]),
    (Subcategory::DataAndAi, &[
        "Data analysis", "Data visualization", "Natural Language Processing (NLP)",
        "Machine Learning", "Deep Learning", "Model deployment", "ETL Pipelines",
        "Big Data", "Apache Spark", "Kafka", "Hadoop",
    ]),
    (Subcategory::Cybersecurity, &[
        "OWASP Top 10", "Penetration Testing", "Threat Modeling", "SIEM", "IDS/IPS",
        "Network Security", "Vulnerability Scanning", "Firewalls", "Security Auditing",
    ]),
    (Subcategory::Other, &[
        "Agile/Scrum", "Kanban", "Design Thinking", "UI/UX Principles", "Accessibility (a11y)",
        "SEO Optimization", "Content Management Systems (CMS)", "WordPress", "Drupal", "Shopify",
    ]),
    (Subcategory::Communication, &[
        "Public speaking", "Writing", "Presentation", "Active listening", "Clear communication",
        "Technical writing", "Documentation", "Stakeholder communication", "Interpersonal communication",
        "Email etiquette", "Giving and receiving feedback",
    ]),
    (Subcategory::Leadership, &[
        "Team management", "Mentoring", "Coaching", "Decision making", "Strategic thinking",
        "Conflict resolution", "Project leadership", "Vision setting", "Delegation", "Change management",
    ]),
    (Subcategory::ProblemSolving, &[
        "Critical thinking", "Analytical skills", "Root cause analysis", "Troubleshooting",
        "Innovation", "Solution-focused thinking", "Creative problem solving",
    ]),
    (Subcategory::Collaboration, &[
        "Teamwork", "Cross-functional collaboration", "Remote collaboration", "Empathy",
        "Building rapport", "Peer learning", "Pair programming",
    ]),
    (Subcategory::Adaptability, &[
        "Time management", "Stress management", "Resilience", "Open-mindedness",
        "Learning from feedback", "Work under pressure", "Flexibility",
    ]),
    (Subcategory::Organization, &[
        "Goal setting", "Prioritization", "Task management", "Multitasking",
        "Attention to detail", "Meeting deadlines", "Planning and scheduling",
    ]),
    (Subcategory::GrowthMindset, &[
        "Continuous learning", "Curiosity", "Self-awareness", "Receptiveness to feedback",
        "Initiative", "Motivation", "Persistence", "Accountability",
    ]),
    (Subcategory::EthicsAndProfessionalism, &[
        "Integrity", "Reliability", "Work ethic", "Respect", "Cultural sensitivity",
        "Confidentiality", "Inclusiveness",
    ]),
];

/// Case-insensitive skill taxonomy, built once and read concurrently afterwards
#[derive(Debug, Clone)]
pub struct SkillDictionary {
    entries: Vec<SkillDefinition>,
    by_key: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
}

impl SkillDictionary {
    /// The built-in taxonomy
    pub fn standard() -> Self {
        Self::from_definitions(
            TAXONOMY
                .iter()
                .flat_map(|(sub, names)| names.iter().map(move |name| SkillDefinition::from_taxonomy(name, *sub))),
        )
    }

    /// Build from arbitrary definitions; a later duplicate key replaces the earlier entry
    pub fn from_definitions(definitions: impl IntoIterator<Item = SkillDefinition>) -> Self {
        let mut entries: Vec<SkillDefinition> = Vec::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();

        for definition in definitions {
            match by_key.get(&definition.key()) {
                Some(&idx) => entries[idx] = definition,
                None => {
                    by_key.insert(definition.key(), entries.len());
                    entries.push(definition);
                }
            }
        }

        let mut by_alias = HashMap::new();
        for (idx, definition) in entries.iter().enumerate() {
            for alias in [normalize_phrase(&definition.name), normalize_phrase(&base_name(&definition.name))] {
                if !alias.is_empty() && !by_key.contains_key(&alias) {
                    by_alias.insert(alias, idx);
                }
            }
        }

        Self { entries, by_key, by_alias }
    }

    /// Exact lower-case name first, then the punctuation-normalized alias
    pub fn lookup(&self, phrase: &str) -> Option<&SkillDefinition> {
        let key = phrase.trim().to_lowercase();
        if let Some(&idx) = self.by_key.get(&key) {
            return Some(&self.entries[idx]);
        }
        self.by_alias
            .get(&normalize_phrase(&key))
            .map(|&idx| &self.entries[idx])
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.lookup(phrase).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SkillDefinition> {
        self.entries.iter()
    }

    pub fn by_category(&self, category: SkillCategory) -> impl Iterator<Item = &SkillDefinition> {
        self.entries.iter().filter(move |d| d.category == category)
    }

    pub fn by_subcategory(&self, subcategory: Subcategory) -> impl Iterator<Item = &SkillDefinition> {
        self.entries.iter().filter(move |d| d.subcategory == subcategory)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SkillDictionary {
    fn default() -> Self {
        Self::standard()
    }
}
