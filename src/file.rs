use std::error::Error;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const FIELDS_PER_BODY: usize = 7;

/// Where a body's orbit is centered, as written in the scene file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentRef {
    /// `*`: the fixed anchor at the center of the screen
    Anchor,
    /// Index of a body declared earlier in the file
    Index(u32),
}

/// One body line of a scene file.
#[derive(Debug, Clone, PartialEq)]
pub struct BodySpec {
    /// Starting orbit angle in whole degrees. `Orrery::from_scene` converts it to
    /// radians, so a file that wrote this column as radians starts its bodies at a
    /// different point on their orbits.
    pub orbit_angle: i64,
    pub orbit_radius: u32,
    pub orbit_speed: f64,
    pub rotation_speed: f64,
    pub selection_radius: u32,
    pub image: PathBuf,
    pub parent: ParentRef,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub bodies: Vec<BodySpec>,
}

#[derive(Debug)]
pub enum SceneError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Empty,
    BadCount {
        line: usize,
        token: String,
    },
    MissingBodies {
        expected: usize,
        found: usize,
    },
    FieldCount {
        line: usize,
        found: usize,
    },
    BadField {
        line: usize,
        field: &'static str,
        expected: &'static str,
        token: String,
    },
    BadParent {
        line: usize,
        index: usize,
        parent: u32,
    },
    Image {
        path: PathBuf,
        source: image::ImageError,
    },
}

impl fmt::Display for SceneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneError::Io { path, .. } => write!(f, "could not read {}", path.display()),
            SceneError::Empty => write!(f, "scene file is empty"),
            SceneError::BadCount { line, token } => write!(
                f,
                "line {}: invalid body count `{}` (expected a non-negative integer)",
                line, token
            ),
            SceneError::MissingBodies { expected, found } => write!(
                f,
                "expected {} bodies, but only found {}",
                expected, found
            ),
            SceneError::FieldCount { line, found } => write!(
                f,
                "line {}: expected {} fields, found {}",
                line, FIELDS_PER_BODY, found
            ),
            SceneError::BadField {
                line,
                field,
                expected,
                token,
            } => write!(
                f,
                "line {}: invalid {} `{}` (expected {})",
                line, field, token, expected
            ),
            SceneError::BadParent {
                line,
                index,
                parent,
            } => write!(
                f,
                "line {}: body {} orbits body {}, which is not declared before it",
                line, index, parent
            ),
            SceneError::Image { path, .. } => {
                write!(f, "could not load image {}", path.display())
            }
        }
    }
}

impl Error for SceneError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SceneError::Io { source, .. } => Some(source),
            SceneError::Image { source, .. } => Some(source),
            _ => None,
        }
    }
}

pub fn read_file(path: &Path) -> Result<Scene, SceneError> {
    let contents = fs::read_to_string(path).map_err(|source| SceneError::Io {
        path: path.to_owned(),
        source,
    })?;
    contents.parse()
}

impl FromStr for Scene {
    type Err = SceneError;

    /// The first line holds the number of bodies N, and each of the next N lines
    /// describes one body:
    ///
    /// `orbit_angle orbit_radius orbit_speed rotation_speed selection_radius image parent`
    ///
    /// where `parent` is `*` for the anchor, or the index of an earlier body.
    /// Blank lines are skipped.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Line numbers start at 1, for error messages
        let mut lines = s
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let (count_line, count_token) = lines.next().ok_or(SceneError::Empty)?;
        let count: usize = count_token.parse().map_err(|_| SceneError::BadCount {
            line: count_line,
            token: count_token.to_owned(),
        })?;

        // The count is untrusted, so the list only grows as body lines are read
        let mut bodies = Vec::new();
        for (line_number, line) in lines.by_ref().take(count) {
            bodies.push(parse_body(line_number, line, bodies.len())?);
        }

        if bodies.len() < count {
            return Err(SceneError::MissingBodies {
                expected: count,
                found: bodies.len(),
            });
        }

        let leftover = lines.count();
        if leftover > 0 {
            log::warn!(
                "Ignoring {} line(s) after the {} declared bodies",
                leftover,
                count
            );
        }

        Ok(Scene { bodies })
    }
}

fn parse_body(line: usize, text: &str, index: usize) -> Result<BodySpec, SceneError> {
    let fields: Vec<&str> = text.split_whitespace().collect();
    if fields.len() != FIELDS_PER_BODY {
        return Err(SceneError::FieldCount {
            line,
            found: fields.len(),
        });
    }

    let bad_field = |field: &'static str, expected: &'static str, token: &str| SceneError::BadField {
        line,
        field,
        expected,
        token: token.to_owned(),
    };

    // Decimal angles are accepted, but only the integer part is kept
    let orbit_angle = fields[0]
        .parse::<f64>()
        .ok()
        .filter(|angle| angle.is_finite())
        .map(|angle| angle.trunc() as i64)
        .ok_or_else(|| bad_field("orbit angle", "a number of degrees", fields[0]))?;

    let orbit_radius = fields[1]
        .parse::<u32>()
        .map_err(|_| bad_field("orbit radius", "a non-negative integer", fields[1]))?;

    let orbit_speed = parse_finite(fields[2])
        .ok_or_else(|| bad_field("orbit speed", "a number", fields[2]))?;

    let rotation_speed = parse_finite(fields[3])
        .ok_or_else(|| bad_field("rotation speed", "a number", fields[3]))?;

    let selection_radius = fields[4]
        .parse::<u32>()
        .map_err(|_| bad_field("selection radius", "a non-negative integer", fields[4]))?;

    let image = PathBuf::from(fields[5]);

    let parent = match fields[6] {
        "*" => ParentRef::Anchor,
        token => {
            let parent = token
                .parse::<u32>()
                .map_err(|_| bad_field("parent", "`*` or a body index", token))?;
            if parent as usize >= index {
                return Err(SceneError::BadParent {
                    line,
                    index,
                    parent,
                });
            }
            ParentRef::Index(parent)
        }
    };

    Ok(BodySpec {
        orbit_angle,
        orbit_radius,
        orbit_speed,
        rotation_speed,
        selection_radius,
        image,
        parent,
    })
}

fn parse_finite(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|x| x.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(s: &str) -> Result<Scene, SceneError> {
        s.parse()
    }

    #[test]
    fn test_star_and_planet() {
        let scene = parse("2\n0 0 0 0 0 star.png *\n0 300 0.01 -1 30 planet.png 0\n").unwrap();

        assert_eq!(scene.bodies.len(), 2);
        assert_eq!(
            scene.bodies[0],
            BodySpec {
                orbit_angle: 0,
                orbit_radius: 0,
                orbit_speed: 0.0,
                rotation_speed: 0.0,
                selection_radius: 0,
                image: PathBuf::from("star.png"),
                parent: ParentRef::Anchor,
            }
        );
        assert_eq!(
            scene.bodies[1],
            BodySpec {
                orbit_angle: 0,
                orbit_radius: 300,
                orbit_speed: 0.01,
                rotation_speed: -1.0,
                selection_radius: 30,
                image: PathBuf::from("planet.png"),
                parent: ParentRef::Index(0),
            }
        );
    }

    #[test]
    fn test_forward_parent() {
        let err = parse("2\n0 0 0 0 0 star.png 1\n0 300 0.01 -1 30 planet.png *\n").unwrap_err();
        match err {
            SceneError::BadParent {
                line,
                index,
                parent,
            } => assert_eq!((line, index, parent), (2, 0, 1)),
            other => panic!("Expected a parent error, got {:?}", other),
        }
    }

    #[test]
    fn test_self_parent() {
        let err = parse("2\n0 0 0 0 0 star.png *\n0 300 0.01 -1 30 planet.png 1\n").unwrap_err();
        assert!(matches!(
            err,
            SceneError::BadParent {
                line: 3,
                index: 1,
                parent: 1
            }
        ));
    }

    #[test]
    fn test_angle_is_truncated() {
        let scene = parse("1\n45.9 50 0.1 -3 10 small_moon.png *").unwrap();
        assert_eq!(scene.bodies[0].orbit_angle, 45);

        let scene = parse("1\n-90.5 50 0.1 -3 10 small_moon.png *").unwrap();
        assert_eq!(scene.bodies[0].orbit_angle, -90);
    }

    #[test]
    fn test_wrong_field_count() {
        let err = parse("1\n0 0 0 0 star.png *").unwrap_err();
        assert!(matches!(err, SceneError::FieldCount { line: 2, found: 6 }));

        let err = parse("1\n0 0 0 0 0 star.png * extra").unwrap_err();
        assert!(matches!(err, SceneError::FieldCount { line: 2, found: 8 }));
    }

    #[test]
    fn test_bad_fields() {
        let cases = [
            ("1\nabc 0 0 0 0 star.png *", "orbit angle"),
            ("1\n0 -5 0 0 0 star.png *", "orbit radius"),
            ("1\n0 1.5 0 0 0 star.png *", "orbit radius"),
            ("1\n0 0 fast 0 0 star.png *", "orbit speed"),
            ("1\n0 0 0 NaN 0 star.png *", "rotation speed"),
            ("1\n0 0 0 0 -1 star.png *", "selection radius"),
            ("1\n0 0 0 0 0 star.png sun", "parent"),
        ];

        for (text, expected_field) in cases.iter() {
            match parse(text) {
                Err(SceneError::BadField { line, field, .. }) => {
                    assert_eq!(line, 2);
                    assert_eq!(field, *expected_field);
                }
                other => panic!("Expected bad {}, got {:?}", expected_field, other),
            }
        }
    }

    #[test]
    fn test_count_errors() {
        assert!(matches!(parse(""), Err(SceneError::Empty)));
        assert!(matches!(parse("\n\n"), Err(SceneError::Empty)));
        assert!(matches!(
            parse("two\n"),
            Err(SceneError::BadCount { line: 1, .. })
        ));
        assert!(matches!(
            parse("3\n0 0 0 0 0 star.png *\n"),
            Err(SceneError::MissingBodies {
                expected: 3,
                found: 1
            })
        ));
    }

    #[test]
    fn test_huge_count_is_missing_bodies() {
        match parse("99999999999999999\n0 0 0 0 0 star.png *\n") {
            Err(SceneError::MissingBodies { expected, found }) => {
                assert_eq!(expected, 99999999999999999);
                assert_eq!(found, 1);
            }
            other => panic!("Expected missing bodies, got {:?}", other),
        }
    }

    #[test]
    fn test_blank_and_trailing_lines() {
        let text = "\n2\n\n0 0 0 -0.5 0 star.png *\n\n0 300 0.01 -1 30 blue_planet.png 0\nnot a body\n";
        let scene = parse(text).unwrap();
        assert_eq!(scene.bodies.len(), 2);
        assert_eq!(scene.bodies[1].parent, ParentRef::Index(0));
    }

    #[test]
    fn test_zero_bodies() {
        let scene = parse("0\n").unwrap();
        assert!(scene.bodies.is_empty());
    }

    #[test]
    fn test_error_messages_name_the_line() {
        let err = parse("1\n0 0 0 0 0 star.png 4").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 2: body 0 orbits body 4, which is not declared before it"
        );

        let err = parse("1\n0 x 0 0 0 star.png *").unwrap_err();
        assert_eq!(
            err.to_string(),
            "line 2: invalid orbit radius `x` (expected a non-negative integer)"
        );
    }

    #[test]
    fn test_missing_file() {
        let err = read_file(Path::new("no/such/scene.txt")).unwrap_err();
        assert!(matches!(err, SceneError::Io { .. }));
        assert!(err.source().is_some());
    }
}
