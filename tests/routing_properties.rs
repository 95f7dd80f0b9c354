//! Property tests: concrete paths built from registered patterns resolve
//! back to those patterns with the substituted values.

use std::collections::HashMap;

use proptest::prelude::*;

use radix_router::routing::Tree;

#[derive(Debug, Clone)]
enum Piece {
    Lit(String),
    Param,
}

/// Pieces of a pattern and whether it ends in a wildcard.
type Shape = (Vec<Piece>, bool);

/// A pattern shape plus the values substituted into it.
type Concrete = (Vec<Piece>, bool, Vec<String>, Option<String>);

// Values start with a digit and literals never do, so a value can only be
// consumed by a dynamic edge.
const PARAM_VALUE: &str = "[0-9][0-9a-z._-]{0,6}";
const WILDCARD_VALUE: &str = "[0-9][0-9a-z/._-]{0,12}";

fn shape() -> impl Strategy<Value = Shape> {
    (
        prop::collection::vec(
            prop_oneof!["[a-z]{1,4}".prop_map(Piece::Lit), Just(Piece::Param)],
            0..5,
        ),
        any::<bool>(),
    )
        .prop_filter("pattern needs at least one segment", |(pieces, wild)| {
            !pieces.is_empty() || *wild
        })
}

fn concrete() -> impl Strategy<Value = Concrete> {
    shape().prop_flat_map(|(pieces, wild)| {
        let params = pieces.iter().filter(|p| matches!(p, Piece::Param)).count();
        let tail = if wild {
            WILDCARD_VALUE.prop_map(Some).boxed()
        } else {
            Just(None).boxed()
        };
        (
            Just(pieces),
            Just(wild),
            prop::collection::vec(PARAM_VALUE, params),
            tail,
        )
    })
}

/// Names depend only on the segment index, so patterns sharing a dynamic
/// position always agree on its name.
fn render(pieces: &[Piece], wild: bool) -> String {
    let mut pattern = String::new();
    for (i, piece) in pieces.iter().enumerate() {
        pattern.push('/');
        match piece {
            Piece::Lit(text) => pattern.push_str(text),
            Piece::Param => pattern.push_str(&format!(":p{i}")),
        }
    }
    if wild {
        pattern.push_str(&format!("/*w{}", pieces.len()));
    }
    pattern
}

fn instantiate(pieces: &[Piece], values: &[String], tail: Option<&str>) -> String {
    let mut path = String::new();
    let mut values = values.iter();
    for piece in pieces {
        path.push('/');
        match piece {
            Piece::Lit(text) => path.push_str(text),
            Piece::Param => path.push_str(values.next().map(String::as_str).unwrap_or_default()),
        }
    }
    if let Some(tail) = tail {
        path.push('/');
        path.push_str(tail);
    }
    path
}

fn expected_values(values: &[String], tail: Option<&str>) -> Vec<String> {
    values.iter().cloned().chain(tail.map(str::to_string)).collect()
}

proptest! {
    #[test]
    fn test_round_trip_single_pattern((pieces, wild, values, tail) in concrete()) {
        let pattern = render(&pieces, wild);
        let mut tree = Tree::new();
        tree.add_route(&pattern, vec![7u8]).unwrap();

        let path = instantiate(&pieces, &values, tail.as_deref());
        let found = tree.find(&path);
        prop_assert!(found.is_some(), "{} did not match {}", path, pattern);
        let m = found.unwrap();

        prop_assert_eq!(m.pattern, pattern.as_str());
        let expected = [7u8];
        prop_assert_eq!(m.handlers, &expected[..]);
        let got: Vec<String> = m.params.iter().map(|(_, v)| v.to_string()).collect();
        prop_assert_eq!(got, expected_values(&values, tail.as_deref()));
    }

    #[test]
    fn test_round_trip_many_patterns(routes in prop::collection::vec(concrete(), 1..8)) {
        let mut tree = Tree::new();
        let mut last: HashMap<String, usize> = HashMap::new();
        for (i, (pieces, wild, _, _)) in routes.iter().enumerate() {
            let pattern = render(pieces, *wild);
            tree.add_route(&pattern, vec![i]).unwrap();
            last.insert(pattern, i);
        }
        prop_assert_eq!(tree.len(), last.len());

        for (pieces, wild, values, tail) in &routes {
            let pattern = render(pieces, *wild);
            let path = instantiate(pieces, values, tail.as_deref());
            let found = tree.find(&path);
            prop_assert!(found.is_some(), "{} did not match any route", path);
            let m = found.unwrap();

            // A wildcard route can lose to a parameter route of equal depth
            // when the wildcard value holds no slash.
            prop_assert!(last.contains_key(m.pattern));
            if m.pattern == pattern {
                let expected = [last[&pattern]];
                prop_assert_eq!(m.handlers, &expected[..]);
                let got: Vec<String> = m.params.iter().map(|(_, v)| v.to_string()).collect();
                prop_assert_eq!(got, expected_values(values, tail.as_deref()));
            }
        }
    }
}
