// Lindenmayer grammar: an axiom of single-character symbols rewritten
// generation by generation through a set of production rules.
//
// Symbols without a rule rewrite to themselves, so every symbol always
// has an outcome. Expansion is pure; the same axiom, rules and
// generation count always give the same result.

use std::collections::HashMap;
use std::fmt;

pub const FORWARD : char = 'F';
pub const TURN_LEFT : char = '+';
pub const TURN_RIGHT : char = '-';
pub const BRANCH_OPEN : char = '[';
pub const BRANCH_CLOSE : char = ']';

// Upper bound on generations accepted from configuration. Growth is
// exponential, the plant rules already reach ~40k symbols at 8.
pub const MAX_ITERATIONS : u32 = 12;

// Symbol sequence for one generation of a plant.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Axiom(String);

impl Axiom {
    pub fn new(symbols : impl Into<String>) -> Axiom {
        Axiom(symbols.into())
    }

    pub fn as_str(self : &Self) -> &str {
        &self.0
    }

    pub fn symbols(self : &Self) -> impl Iterator<Item = char> + '_ {
        self.0.chars()
    }

    pub fn len(self : &Self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(self : &Self) -> bool {
        self.0.is_empty()
    }

    pub fn count(self : &Self, symbol : char) -> usize {
        self.0.chars().filter(|&c| c == symbol).count()
    }

    // Opens minus closes over the whole sequence.
    pub fn bracket_balance(self : &Self) -> i64 {
        self.symbols().fold(0, |acc, c| match c {
            BRANCH_OPEN => acc + 1,
            BRANCH_CLOSE => acc - 1,
            _ => acc,
        })
    }

    // True when no prefix closes more branches than it opened and every
    // branch is closed by the end.
    pub fn is_balanced(self : &Self) -> bool {
        let mut depth : i64 = 0;
        for c in self.symbols() {
            match c {
                BRANCH_OPEN => depth += 1,
                BRANCH_CLOSE => {
                    depth -= 1;
                    if depth < 0 {
                        return false;
                    }
                }
                _ => {}
            }
        }
        depth == 0
    }
}

impl From<&str> for Axiom {
    fn from(symbols : &str) -> Axiom {
        Axiom::new(symbols)
    }
}

impl From<String> for Axiom {
    fn from(symbols : String) -> Axiom {
        Axiom(symbols)
    }
}

impl fmt::Display for Axiom {
    fn fmt(&self, f : &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Production rules keyed by the symbol they replace.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProductionRules {
    rules : HashMap<char, String>
}

impl ProductionRules {
    pub fn init() -> ProductionRules {
        ProductionRules { rules : HashMap::new() }
    }

    // F -> FF, X -> F[+X][-X]FX: the fractal plant grown from `X`.
    pub fn plant() -> ProductionRules {
        ProductionRules::init()
            .with_rule(FORWARD, "FF")
            .with_rule('X', "F[+X][-X]FX")
    }

    pub fn with_rule(mut self, symbol : char, replacement : impl Into<String>) -> ProductionRules {
        self.rules.insert(symbol, replacement.into());
        self
    }

    pub fn rule(self : &Self, symbol : char) -> Option<&str> {
        self.rules.get(&symbol).map(String::as_str)
    }

    fn rewrite_into(self : &Self, symbol : char, out : &mut String) {
        match self.rules.get(&symbol) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(symbol),
        }
    }

    // One generation: every symbol replaced in place, order preserved.
    pub fn apply(self : &Self, axiom : &Axiom) -> Axiom {
        let mut result = String::with_capacity(axiom.0.len() * 2);
        for symbol in axiom.symbols() {
            self.rewrite_into(symbol, &mut result);
        }
        Axiom(result)
    }

    // Axiom after exactly `iterations` generations; zero returns a copy.
    pub fn expand(self : &Self, axiom : &Axiom, iterations : u32) -> Axiom {
        let mut current = axiom.clone();
        for generation in 1..=iterations {
            current = self.apply(&current);
            tracing::debug!(generation, symbols = current.len(), "expanded axiom");
        }
        current
    }
}
