//! Built-in catalog of practice problems.
//!
//! Problems are ordered; the daily rotation addresses them by 1-based
//! sequence position. The catalog is loaded once and never mutated.

use crate::types::*;
use once_cell::sync::Lazy;

/// Cached default catalog - built once and reused across all operations
static DEFAULT_CATALOG: Lazy<Catalog> = Lazy::new(build_default_catalog_internal);

/// Get a reference to the cached default catalog
pub fn get_default_catalog() -> &'static Catalog {
    &DEFAULT_CATALOG
}

/// Builds the default catalog of practice problems
///
/// **Note**: For production use, prefer `get_default_catalog()` which returns a
/// cached reference. This function is retained for testing and custom catalog creation.
pub fn build_default_catalog() -> Catalog {
    build_default_catalog_internal()
}

/// The ordered, immutable collection of practice problems
#[derive(Clone, Debug)]
pub struct Catalog {
    pub problems: Vec<Problem>,
}

impl Catalog {
    pub fn new(problems: Vec<Problem>) -> Self {
        Self { problems }
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    /// Look up a problem by its 1-based sequence number (rotation order)
    pub fn by_number(&self, number: usize) -> Option<&Problem> {
        if number == 0 {
            return None;
        }
        self.problems.get(number - 1)
    }

    /// Look up a problem by id
    pub fn by_id(&self, id: &str) -> Option<&Problem> {
        self.problems.iter().find(|p| p.id == id)
    }

    /// All distinct topics, in first-appearance order
    pub fn unique_topics(&self) -> Vec<String> {
        let mut topics: Vec<String> = Vec::new();
        for problem in &self.problems {
            if !topics.contains(&problem.topic) {
                topics.push(problem.topic.clone());
            }
        }
        topics
    }

    /// Distinct topics among problems passing the exam facet
    pub fn topics_for_exam(&self, exam: ExamFilter) -> Vec<String> {
        let mut topics: Vec<String> = Vec::new();
        for problem in &self.problems {
            if exam.allows(problem.exam) && !topics.contains(&problem.topic) {
                topics.push(problem.topic.clone());
            }
        }
        topics
    }

    /// Indices of problems matching the filter selection
    ///
    /// Recomputed on every call; the catalog is small enough that no
    /// index structure is warranted.
    pub fn filter(&self, selection: &FilterSelection) -> Vec<usize> {
        self.problems
            .iter()
            .enumerate()
            .filter(|(_, p)| selection.matches(p))
            .map(|(i, _)| i)
            .collect()
    }

    /// Validate the catalog for consistency and completeness
    ///
    /// Returns a list of validation errors, or empty Vec if valid. A catalog
    /// failing this check must be rejected at load time rather than allowed
    /// to misbehave later.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.problems.is_empty() {
            errors.push("Catalog has no problems".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for problem in &self.problems {
            if problem.id.is_empty() {
                errors.push("Problem has empty ID".to_string());
                continue;
            }
            if !seen.insert(problem.id.as_str()) {
                errors.push(format!("Duplicate problem ID '{}'", problem.id));
            }
            if problem.question.is_empty() {
                errors.push(format!("Problem '{}' has empty question", problem.id));
            }
            if problem.topic.is_empty() {
                errors.push(format!("Problem '{}' has empty topic", problem.id));
            }
            if problem.choices.len() < 2 {
                errors.push(format!(
                    "Problem '{}' has {} choices (need at least 2)",
                    problem.id,
                    problem.choices.len()
                ));
            }
            if problem.correct_answer >= problem.choices.len() {
                errors.push(format!(
                    "Problem '{}': correct answer index {} out of bounds for {} choices",
                    problem.id,
                    problem.correct_answer,
                    problem.choices.len()
                ));
            }
        }

        errors
    }
}

/// Internal function that actually builds the catalog
fn build_default_catalog_internal() -> Catalog {
    let mut problems = Vec::new();

    // ========================================================================
    // F=ma Problems
    // ========================================================================

    problems.push(Problem {
        id: "fma-1".into(),
        exam: Exam::Fma,
        topic: "Kinematics".into(),
        difficulty: Difficulty::Easy,
        question: r"A ball is thrown horizontally from a cliff of height $h$ with initial velocity $v_0$. How far from the base of the cliff does the ball land?".into(),
        choices: vec![
            r"$v_0 \sqrt{\frac{h}{g}}$".into(),
            r"$v_0 \sqrt{\frac{2h}{g}}$".into(),
            r"$v_0 \sqrt{\frac{h}{2g}}$".into(),
            r"$2v_0 \sqrt{\frac{h}{g}}$".into(),
        ],
        correct_answer: 1,
        solution: r"Time to fall: $h = \frac{1}{2}gt^2 \Rightarrow t = \sqrt{\frac{2h}{g}}$

Horizontal distance: $x = v_0 t = v_0\sqrt{\frac{2h}{g}}$".into(),
    });

    problems.push(Problem {
        id: "fma-2".into(),
        exam: Exam::Fma,
        topic: "Newton's Laws".into(),
        difficulty: Difficulty::Easy,
        question: r"A block of mass $m$ is placed on a frictionless inclined plane of angle $\theta$. What is the acceleration of the block down the incline?".into(),
        choices: vec![
            r"$g$".into(),
            r"$g\cos\theta$".into(),
            r"$g\sin\theta$".into(),
            r"$g\tan\theta$".into(),
        ],
        correct_answer: 2,
        solution: r"Using Newton's second law along the incline:
$$ma = mg\sin\theta$$
$$a = g\sin\theta$$".into(),
    });

    problems.push(Problem {
        id: "fma-3".into(),
        exam: Exam::Fma,
        topic: "Momentum".into(),
        difficulty: Difficulty::Medium,
        question: r"Two blocks of masses $m_1$ and $m_2$ are connected by a massless string over a frictionless pulley. If $m_1 > m_2$, what is the acceleration of the system?".into(),
        choices: vec![
            r"$\frac{(m_1 + m_2)g}{m_1 - m_2}$".into(),
            r"$\frac{(m_1 - m_2)g}{m_1 + m_2}$".into(),
            r"$\frac{m_1 g}{m_2}$".into(),
            r"$\frac{m_2 g}{m_1}$".into(),
        ],
        correct_answer: 1,
        solution: r"For $m_1$: $m_1 g - T = m_1 a$
For $m_2$: $T - m_2 g = m_2 a$

Adding: $(m_1 - m_2)g = (m_1 + m_2)a$
$$a = \frac{(m_1 - m_2)g}{m_1 + m_2}$$".into(),
    });

    problems.push(Problem {
        id: "fma-4".into(),
        exam: Exam::Fma,
        topic: "Energy".into(),
        difficulty: Difficulty::Easy,
        question: r"A spring with spring constant $k$ is compressed by distance $x$. What is the maximum speed of a mass $m$ attached to the spring when released?".into(),
        choices: vec![
            r"$x\sqrt{\frac{k}{m}}$".into(),
            r"$x\sqrt{\frac{m}{k}}$".into(),
            r"$\frac{kx}{m}$".into(),
            r"$\frac{kx^2}{2m}$".into(),
        ],
        correct_answer: 0,
        solution: r"By conservation of energy:
$$\frac{1}{2}kx^2 = \frac{1}{2}mv^2$$
$$v = x\sqrt{\frac{k}{m}}$$".into(),
    });

    problems.push(Problem {
        id: "fma-5".into(),
        exam: Exam::Fma,
        topic: "Rotational Motion".into(),
        difficulty: Difficulty::Hard,
        question: "A solid sphere and a hollow sphere of the same mass and radius roll down an incline without slipping. Which reaches the bottom first?".into(),
        choices: vec![
            "The solid sphere".into(),
            "The hollow sphere".into(),
            "They reach at the same time".into(),
            "Depends on the angle of incline".into(),
        ],
        correct_answer: 0,
        solution: r"The solid sphere has a smaller moment of inertia ($I = \frac{2}{5}mr^2$) compared to the hollow sphere ($I = \frac{2}{3}mr^2$). Less rotational inertia means more translational kinetic energy, so the solid sphere accelerates faster and reaches the bottom first.".into(),
    });

    problems.push(Problem {
        id: "fma-6".into(),
        exam: Exam::Fma,
        topic: "Oscillations".into(),
        difficulty: Difficulty::Medium,
        question: "A simple pendulum has period $T$. If the length is quadrupled, what is the new period?".into(),
        choices: vec!["$T/2$".into(), "$T$".into(), "$2T$".into(), "$4T$".into()],
        correct_answer: 2,
        solution: r"Period of a pendulum: $T = 2\pi\sqrt{\frac{L}{g}}$

If $L \to 4L$:
$$T' = 2\pi\sqrt{\frac{4L}{g}} = 2 \cdot 2\pi\sqrt{\frac{L}{g}} = 2T$$".into(),
    });

    // ========================================================================
    // Physics Bowl Problems
    // ========================================================================

    problems.push(Problem {
        id: "pb-1".into(),
        exam: Exam::PhysicsBowl,
        topic: "Modern Physics".into(),
        difficulty: Difficulty::Easy,
        question: r"A photon has energy $E = 3.0$ eV. What is its wavelength? (Use $hc = 1240$ eV$\cdot$nm)".into(),
        choices: vec![
            "$207$ nm".into(),
            "$413$ nm".into(),
            "$620$ nm".into(),
            "$826$ nm".into(),
        ],
        correct_answer: 1,
        solution: r"Using $E = \frac{hc}{\lambda}$:
$$\lambda = \frac{hc}{E} = \frac{1240 \text{ eV}\cdot\text{nm}}{3.0 \text{ eV}} = 413 \text{ nm}$$".into(),
    });

    problems.push(Problem {
        id: "pb-2".into(),
        exam: Exam::PhysicsBowl,
        topic: "Thermodynamics".into(),
        difficulty: Difficulty::Easy,
        question: "An ideal gas undergoes an isothermal expansion, doubling its volume. By what factor does the pressure change?".into(),
        choices: vec!["$4$".into(), "$2$".into(), "$1/2$".into(), "$1/4$".into()],
        correct_answer: 2,
        solution: r"For an isothermal process, $PV = $ constant.
$$P_1 V_1 = P_2 V_2$$
$$P_2 = P_1 \frac{V_1}{V_2} = P_1 \cdot \frac{1}{2} = \frac{P_1}{2}$$".into(),
    });

    problems.push(Problem {
        id: "pb-3".into(),
        exam: Exam::PhysicsBowl,
        topic: "Optics".into(),
        difficulty: Difficulty::Medium,
        question: r"Light travels from air into water (index of refraction $n = 1.33$) at an angle of incidence of $45°$. What is the angle of refraction?".into(),
        choices: vec![
            "$25°$".into(),
            "$32°$".into(),
            "$45°$".into(),
            "$60°$".into(),
        ],
        correct_answer: 1,
        solution: r"Using Snell's law: $n_1 \sin\theta_1 = n_2 \sin\theta_2$
$$1.00 \cdot \sin 45° = 1.33 \cdot \sin\theta_2$$
$$\sin\theta_2 = \frac{0.707}{1.33} = 0.532$$
$$\theta_2 = \arcsin(0.532) \approx 32°$$".into(),
    });

    problems.push(Problem {
        id: "pb-4".into(),
        exam: Exam::PhysicsBowl,
        topic: "Electricity".into(),
        difficulty: Difficulty::Hard,
        question: "Two identical capacitors are connected in series to a battery. If the same capacitors are reconnected in parallel to the same battery, the energy stored:".into(),
        choices: vec![
            "Decreases by a factor of 4".into(),
            "Decreases by a factor of 2".into(),
            "Increases by a factor of 2".into(),
            "Increases by a factor of 4".into(),
        ],
        correct_answer: 3,
        solution: r"Series: $C_{eq} = C/2$, Energy $= \frac{1}{2}(C/2)V^2 = \frac{CV^2}{4}$

Parallel: $C_{eq} = 2C$, Energy $= \frac{1}{2}(2C)V^2 = CV^2$

Ratio: $\frac{CV^2}{CV^2/4} = 4$".into(),
    });

    problems.push(Problem {
        id: "pb-5".into(),
        exam: Exam::PhysicsBowl,
        topic: "Waves".into(),
        difficulty: Difficulty::Easy,
        question: "A string fixed at both ends has a fundamental frequency of 200 Hz. What is the frequency of the third harmonic?".into(),
        choices: vec![
            "$200$ Hz".into(),
            "$400$ Hz".into(),
            "$600$ Hz".into(),
            "$800$ Hz".into(),
        ],
        correct_answer: 2,
        solution: r"For a string fixed at both ends, harmonics are integer multiples of the fundamental:
$$f_n = n \cdot f_1$$
$$f_3 = 3 \times 200 = 600 \text{ Hz}$$".into(),
    });

    problems.push(Problem {
        id: "pb-6".into(),
        exam: Exam::PhysicsBowl,
        topic: "Magnetism".into(),
        difficulty: Difficulty::Medium,
        question: "A proton moves with velocity $v$ perpendicular to a magnetic field $B$. The radius of its circular path is $r$. If the velocity is doubled, the new radius is:".into(),
        choices: vec![
            "$r/2$".into(),
            "$r$".into(),
            "$2r$".into(),
            "$4r$".into(),
        ],
        correct_answer: 2,
        solution: r"For circular motion in a magnetic field:
$$r = \frac{mv}{qB}$$

If $v \to 2v$:
$$r' = \frac{m(2v)}{qB} = 2r$$".into(),
    });

    Catalog::new(problems)
}
