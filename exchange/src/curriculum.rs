//! AP Calculus BC curriculum catalog: units, skills, and topic descriptions.

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

/// A skill within a curriculum unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skill {
    /// Dotted identifier, e.g. `"3.1"`.
    pub id: &'static str,
    /// Short description.
    pub name: &'static str,
}

/// A curriculum unit and its skills.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    /// Unit number, 1-based.
    pub number: u8,
    /// Unit title.
    pub name: &'static str,
    /// Skills in catalog order.
    pub skills: &'static [Skill],
}

const fn skill(id: &'static str, name: &'static str) -> Skill {
    Skill { id, name }
}

/// The full AP Calculus BC catalog.
pub static UNITS: &[Unit] = &[
    Unit {
        number: 1,
        name: "Limits and Continuity",
        skills: &[
            skill("1.1", "Instantaneous Change via Limits"),
            skill("1.2", "Limit Definition and Properties"),
            skill("1.3", "Continuity Definition and Intervals"),
            skill("1.4", "Asymptotes and Limits at Infinity"),
            skill("1.5", "Squeeze Theorem and Intermediate Value Theorem"),
        ],
    },
    Unit {
        number: 2,
        name: "Differentiation: Definition and Fundamental Properties",
        skills: &[
            skill("2.1", "Derivative Definition"),
            skill("2.2", "Differentiability and Continuity"),
            skill("2.3", "Derivatives of Elementary Functions"),
            skill("2.4", "Basic Differentiation Rules"),
        ],
    },
    Unit {
        number: 3,
        name: "Differentiation: Composite, Implicit, and Inverse Functions",
        skills: &[
            skill("3.1", "The Chain Rule"),
            skill("3.2", "Implicit Differentiation"),
            skill("3.3", "Derivatives of Inverse Functions"),
            skill("3.4", "Higher-Order Derivatives"),
        ],
    },
    Unit {
        number: 4,
        name: "Contextual Applications of Differentiation",
        skills: &[
            skill("4.1", "Interpreting Rates of Change"),
            skill("4.2", "Motion Problems (Position, Velocity, Acceleration)"),
            skill("4.3", "Rates of Change in Context"),
            skill("4.4", "Related Rates"),
            skill("4.5", "Local Linearity and Approximation"),
            skill("4.6", "L'Hopital's Rule"),
        ],
    },
    Unit {
        number: 5,
        name: "Analytical Applications of Differentiation",
        skills: &[
            skill("5.1", "Mean Value Theorem and Extreme Value Theorem"),
            skill("5.2", "Derivatives and Function Properties"),
            skill("5.3", "First and Second Derivative Tests, Candidates Test"),
            skill("5.4", "Graph Sketching (Functions and Derivatives)"),
            skill("5.5", "Optimization Problems"),
            skill("5.6", "Behaviors of Implicit Relations"),
        ],
    },
    Unit {
        number: 6,
        name: "Integration and Accumulation of Change",
        skills: &[
            skill("6.1", "Accumulated Change via Definite Integrals"),
            skill("6.2", "Approximating Integrals (Riemann Sums)"),
            skill("6.3", "FTC and Accumulation Functions"),
            skill("6.4", "Antiderivatives and Indefinite Integrals"),
            skill("6.5", "Integration Properties and Techniques (Extended)"),
            skill("6.6", "Improper Integrals"),
        ],
    },
    Unit {
        number: 7,
        name: "Differential Equations",
        skills: &[
            skill("7.1", "Separable Differential Equations (Interpretation)"),
            skill("7.2", "Slope Fields and Solution Curves"),
            skill("7.3", "Euler's Method"),
            skill("7.4", "Solving Separable Differential Equations"),
            skill("7.5", "Exponential and Logistic Models"),
        ],
    },
    Unit {
        number: 8,
        name: "Applications of Integration",
        skills: &[
            skill("8.1", "Average Value of a Function"),
            skill("8.2", "Particle Motion (Integration)"),
            skill("8.3", "Accumulation Problems"),
            skill("8.4", "Area Between Curves"),
            skill("8.5", "Volume (Cross-Sections, Disc/Washer)"),
            skill("8.6", "Arc Length of Planar Curves"),
        ],
    },
    Unit {
        number: 9,
        name: "Parametric Equations, Polar Coordinates, and Vector-Valued Functions",
        skills: &[
            skill("9.1", "Derivatives of Parametric and Vector Functions"),
            skill("9.2", "Arc Length of Parametric Curves (Integration)"),
            skill("9.3", "Particle Position in a Plane"),
            skill("9.4", "Velocity, Speed, and Acceleration (Curves)"),
            skill("9.5", "Derivatives of Polar Functions"),
            skill("9.6", "Area of Polar Regions"),
        ],
    },
    Unit {
        number: 10,
        name: "Infinite Sequences and Series",
        skills: &[
            skill("10.1", "Convergence of Infinite Series (Limits)"),
            skill("10.2", "Types of Series (Geometric, Harmonic, p-series)"),
            skill("10.3", "Divergence Test and Convergence Tests"),
            skill("10.4", "Approximating Series Sums and Error Bounds"),
            skill("10.5", "Radius and Interval of Convergence"),
            skill("10.6", "Taylor and Maclaurin Series"),
        ],
    },
];

/// Errors from curriculum lookups and selection parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CurriculumError {
    /// The unit number is not in the catalog.
    #[error("Unit {0} not found. Available units: 1-{max}", max = UNITS.len())]
    UnknownUnit(u8),

    /// The skill identifier is not in the catalog.
    #[error("Skill '{0}' not found. Expected an identifier like '3.1'")]
    UnknownSkill(String),

    /// The unit selection could not be parsed.
    #[error("Invalid unit selection '{0}'. Use a single unit (e.g. 1) or an ascending range (e.g. 1-3)")]
    InvalidSelection(String),
}

/// Looks up a unit by number.
///
/// # Errors
///
/// Returns `CurriculumError::UnknownUnit` for numbers outside the catalog.
pub fn unit(number: u8) -> Result<&'static Unit, CurriculumError> {
    UNITS
        .iter()
        .find(|u| u.number == number)
        .ok_or(CurriculumError::UnknownUnit(number))
}

/// Looks up a skill by its dotted identifier, returning it with its unit.
///
/// # Errors
///
/// Returns `CurriculumError::UnknownSkill` when no unit lists the identifier.
pub fn skill_by_id(id: &str) -> Result<(&'static Unit, &'static Skill), CurriculumError> {
    let id = id.trim();
    UNITS
        .iter()
        .find_map(|u| u.skills.iter().find(|s| s.id == id).map(|s| (u, s)))
        .ok_or_else(|| CurriculumError::UnknownSkill(id.to_string()))
}

/// Parses a unit selection: a single unit (`"4"`) or an inclusive range (`"1-3"`).
///
/// # Errors
///
/// Returns `CurriculumError::InvalidSelection` for malformed or descending
/// ranges, and `CurriculumError::UnknownUnit` for units outside the catalog.
pub fn parse_unit_selection(selection: &str) -> Result<Vec<&'static Unit>, CurriculumError> {
    let invalid = || CurriculumError::InvalidSelection(selection.to_string());
    let trimmed = selection.trim();

    let (start, end) = match trimmed.split_once('-') {
        Some((a, b)) => (
            a.trim().parse::<u8>().map_err(|_| invalid())?,
            b.trim().parse::<u8>().map_err(|_| invalid())?,
        ),
        None => {
            let n = trimmed.parse::<u8>().map_err(|_| invalid())?;
            (n, n)
        }
    };

    if start > end {
        return Err(invalid());
    }

    (start..=end).map(unit).collect()
}

/// A curriculum area that constrains question generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    /// Any skill within the unit.
    Unit(&'static Unit),
    /// One specific skill.
    Skill(&'static Unit, &'static Skill),
}

impl Topic {
    /// Picks a random skill from the given units.
    ///
    /// Returns `None` when `units` is empty.
    pub fn random_skill<R: Rng + ?Sized>(units: &[&'static Unit], rng: &mut R) -> Option<Self> {
        let unit = units.choose(rng)?;
        let skill = unit.skills.choose(rng)?;
        Some(Self::Skill(*unit, skill))
    }

    /// Text embedded in the generation prompt.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Unit(u) => format!("Unit {}: {}", u.number, u.name),
            Self::Skill(u, s) => format!(
                "Unit {}: {} - Skill {}: {}",
                u.number, u.name, s.id, s.name
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_catalog_has_ten_units_with_unique_skill_ids() {
        assert_eq!(UNITS.len(), 10);
        let mut ids: Vec<&str> = UNITS.iter().flat_map(|u| u.skills.iter().map(|s| s.id)).collect();
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_skill_ids_are_prefixed_by_their_unit() {
        for u in UNITS {
            for s in u.skills {
                assert!(s.id.starts_with(&format!("{}.", u.number)), "{} in unit {}", s.id, u.number);
            }
        }
    }

    #[test]
    fn test_selection_accepts_single_units_and_ranges() {
        let single = parse_unit_selection("4").unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].number, 4);

        let range = parse_unit_selection(" 1-3 ").unwrap();
        assert_eq!(range.iter().map(|u| u.number).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn test_selection_rejects_bad_ranges() {
        assert!(matches!(parse_unit_selection("3-1"), Err(CurriculumError::InvalidSelection(_))));
        assert!(matches!(parse_unit_selection("x"), Err(CurriculumError::InvalidSelection(_))));
        assert_eq!(parse_unit_selection("9-11"), Err(CurriculumError::UnknownUnit(11)));
        assert_eq!(parse_unit_selection("0"), Err(CurriculumError::UnknownUnit(0)));
    }

    #[test]
    fn test_skill_lookup_returns_its_unit() {
        let (u, s) = skill_by_id("3.1").unwrap();
        assert_eq!(u.number, 3);
        assert_eq!(s.name, "The Chain Rule");
        assert!(skill_by_id("3.9").is_err());
    }

    #[test]
    fn test_topic_description_names_unit_and_skill() {
        let (u, s) = skill_by_id("8.4").unwrap();
        let text = Topic::Skill(u, s).describe();
        assert!(text.contains("Applications of Integration"));
        assert!(text.contains("Area Between Curves"));

        let mut rng = StdRng::seed_from_u64(1);
        let picked = Topic::random_skill(&[u], &mut rng).unwrap();
        assert!(matches!(picked, Topic::Skill(pu, _) if pu.number == 8));
        assert!(Topic::random_skill(&[], &mut rng).is_none());
    }
}
