//! Formula compiler.
//!
//! Turns a raw formula string into an ordered sequence of signed [`Term`]s.
//! Whitespace is insignificant anywhere in the formula. Each signed run is
//! normalized (`adv`/`dis` shorthands), lexed, and matched against the dice
//! grammar `[count] d faces [kh|kl|dh|dl n] [r [op] threshold] [!]`; bodies
//! that are not dice must be a lone numeric literal.

use crate::error::{FormulaError, FormulaResult};
use crate::lexer::{self, Token};
use crate::term::{
    DiceTerm, FlatTerm, KeepDrop, KeepDropMode, Reroll, RerollOp, Sign, Term,
};

/// Compile a formula into its ordered terms.
///
/// Fails with [`FormulaError::Empty`] when the stripped formula yields no
/// terms, [`FormulaError::UnrecognizedTerm`] for a body that is neither a
/// dice expression nor a numeric literal, and
/// [`FormulaError::ImpossibleReroll`] for a reroll condition no face of the
/// die can escape.
pub fn compile(formula: &str) -> FormulaResult<Vec<Term>> {
    let stripped: String = formula.chars().filter(|c| !c.is_whitespace()).collect();
    let runs = split_signed_runs(&stripped);
    if runs.is_empty() {
        return Err(FormulaError::Empty);
    }
    runs.into_iter()
        .map(|(sign, body)| parse_term(sign, body))
        .collect()
}

/// Split a stripped formula into signed runs.
///
/// A run is one or more consecutive non-sign characters; its sign is the
/// `+`/`-` immediately preceding it, defaulting to `+`. Sign characters not
/// directly attached to a run are discarded, mirroring the term pattern
/// `[+-]?[^+-]+` of the original notation.
fn split_signed_runs(stripped: &str) -> Vec<(Sign, &str)> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;
    for (i, c) in stripped.char_indices() {
        if c == '+' || c == '-' {
            if let Some(s) = start.take() {
                runs.push((sign_before(stripped, s), &stripped[s..i]));
            }
        } else if start.is_none() {
            start = Some(i);
        }
    }
    if let Some(s) = start {
        runs.push((sign_before(stripped, s), &stripped[s..]));
    }
    runs
}

fn sign_before(s: &str, start: usize) -> Sign {
    if start > 0 && s.as_bytes()[start - 1] == b'-' {
        Sign::Minus
    } else {
        Sign::Plus
    }
}

/// Rewrite the `adv`/`dis` shorthands to their full dice expressions.
fn normalize_shorthand(body: &str) -> &str {
    if body.eq_ignore_ascii_case("adv") {
        "2d20kh1"
    } else if body.eq_ignore_ascii_case("dis") {
        "2d20kl1"
    } else {
        body
    }
}

fn parse_term(sign: Sign, body: &str) -> FormulaResult<Term> {
    let body = normalize_shorthand(body);
    let Some(tokens) = lexer::lex(body) else {
        return Err(FormulaError::UnrecognizedTerm(body.to_string()));
    };
    if let Some(dice) = parse_dice(sign, body, &tokens)? {
        return Ok(Term::Dice(dice));
    }
    if let Some(flat) = parse_flat(sign, body, &tokens) {
        return Ok(Term::Flat(flat));
    }
    Err(FormulaError::UnrecognizedTerm(body.to_string()))
}

/// Match the token sequence against the dice grammar.
///
/// Returns `Ok(None)` when the shape does not match (the caller then tries
/// the numeric fallback); an impossible reroll on a matching shape is a hard
/// error, not a fallback.
fn parse_dice(sign: Sign, raw: &str, tokens: &[Token]) -> FormulaResult<Option<DiceTerm>> {
    let mut cursor = Cursor::new(tokens);

    let count = match cursor.eat_integer() {
        Some(n) => match u32::try_from(n) {
            Ok(n) => n,
            Err(_) => return Ok(None),
        },
        None => 1,
    };

    if !cursor.eat(&Token::Die) {
        return Ok(None);
    }
    let faces = match cursor.eat_integer().map(u32::try_from) {
        Some(Ok(n)) if n >= 1 => n,
        _ => return Ok(None),
    };

    let keep_drop = match cursor.eat_keep_drop_mode() {
        Some(mode) => match cursor.eat_integer().map(usize::try_from) {
            // A zero count degenerates to "no selection": every die is kept.
            Some(Ok(0)) => None,
            Some(Ok(n)) => Some(KeepDrop { mode, n }),
            _ => return Ok(None),
        },
        None => None,
    };

    let reroll = if cursor.eat(&Token::Reroll) {
        let op = cursor.eat_reroll_op().unwrap_or(RerollOp::Eq);
        match cursor.eat_integer().map(u32::try_from) {
            Some(Ok(threshold)) => Some(Reroll { op, threshold }),
            _ => return Ok(None),
        }
    } else {
        None
    };

    let explode = cursor.eat(&Token::Bang);

    if !cursor.at_end() {
        return Ok(None);
    }

    if let Some(r) = &reroll {
        if r.matches_all_faces(faces) {
            return Err(FormulaError::ImpossibleReroll {
                term: raw.to_string(),
                faces,
            });
        }
    }

    Ok(Some(DiceTerm {
        sign,
        count,
        faces,
        keep_drop,
        reroll,
        explode,
        raw: raw.to_string(),
    }))
}

fn parse_flat(sign: Sign, raw: &str, tokens: &[Token]) -> Option<FlatTerm> {
    let value = match tokens {
        [Token::Integer(n)] => *n as f64,
        [Token::Decimal(v)] => *v,
        _ => return None,
    };
    Some(FlatTerm {
        sign,
        value,
        raw: raw.to_string(),
    })
}

/// Forward-only cursor over a term's token list.
struct Cursor<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn eat_integer(&mut self) -> Option<u64> {
        if let Some(Token::Integer(n)) = self.peek() {
            self.pos += 1;
            Some(*n)
        } else {
            None
        }
    }

    fn eat_keep_drop_mode(&mut self) -> Option<KeepDropMode> {
        let mode = match self.peek()? {
            Token::KeepHigh => KeepDropMode::KeepHighest,
            Token::KeepLow => KeepDropMode::KeepLowest,
            Token::DropHigh => KeepDropMode::DropHighest,
            Token::DropLow => KeepDropMode::DropLowest,
            _ => return None,
        };
        self.pos += 1;
        Some(mode)
    }

    fn eat_reroll_op(&mut self) -> Option<RerollOp> {
        let op = match self.peek()? {
            Token::LessEq => RerollOp::LessEq,
            Token::GreaterEq => RerollOp::GreaterEq,
            Token::Less => RerollOp::Less,
            Token::Greater => RerollOp::Greater,
            Token::Equal => RerollOp::Eq,
            _ => return None,
        };
        self.pos += 1;
        Some(op)
    }

    fn at_end(&self) -> bool {
        self.pos == self.tokens.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dice(term: &Term) -> &DiceTerm {
        match term {
            Term::Dice(d) => d,
            Term::Flat(_) => panic!("expected dice term"),
        }
    }

    fn flat(term: &Term) -> &FlatTerm {
        match term {
            Term::Flat(f) => f,
            Term::Dice(_) => panic!("expected flat term"),
        }
    }

    #[test]
    fn simple_dice_and_modifier() {
        let terms = compile("1d20+5").unwrap();
        assert_eq!(terms.len(), 2);

        let d = dice(&terms[0]);
        assert_eq!(d.sign, Sign::Plus);
        assert_eq!(d.count, 1);
        assert_eq!(d.faces, 20);
        assert!(d.keep_drop.is_none());
        assert!(d.reroll.is_none());
        assert!(!d.explode);

        let f = flat(&terms[1]);
        assert_eq!(f.sign, Sign::Plus);
        assert_eq!(f.value, 5.0);
    }

    #[test]
    fn count_defaults_to_one() {
        let terms = compile("d20").unwrap();
        assert_eq!(dice(&terms[0]).count, 1);
    }

    #[test]
    fn count_zero_is_legal() {
        let terms = compile("0d6").unwrap();
        assert_eq!(dice(&terms[0]).count, 0);
    }

    #[test]
    fn signs_and_order_preserved() {
        let terms = compile("2d6-3+1d4").unwrap();
        assert_eq!(terms.len(), 3);
        assert_eq!(dice(&terms[0]).sign, Sign::Plus);
        assert_eq!(flat(&terms[1]).sign, Sign::Minus);
        assert_eq!(flat(&terms[1]).value, 3.0);
        assert_eq!(dice(&terms[2]).sign, Sign::Plus);
        assert_eq!(dice(&terms[2]).raw, "1d4");
    }

    #[test]
    fn leading_minus() {
        let terms = compile("-2d4").unwrap();
        assert_eq!(dice(&terms[0]).sign, Sign::Minus);
    }

    #[test]
    fn whitespace_is_insignificant() {
        let spaced = compile(" 2 D 6 + 3 ").unwrap();
        let compact = compile("2d6+3").unwrap();
        // The raw text keeps the user's casing, so compare structure.
        assert_eq!(dice(&spaced[0]).count, dice(&compact[0]).count);
        assert_eq!(dice(&spaced[0]).faces, dice(&compact[0]).faces);
        assert_eq!(flat(&spaced[1]).value, flat(&compact[1]).value);
    }

    #[test]
    fn keep_drop_variants() {
        let kh = dice(&compile("2d20kh1").unwrap()[0]).keep_drop.unwrap();
        assert_eq!(kh.mode, KeepDropMode::KeepHighest);
        assert_eq!(kh.n, 1);

        let kl = dice(&compile("2d20kl1").unwrap()[0]).keep_drop.unwrap();
        assert_eq!(kl.mode, KeepDropMode::KeepLowest);

        let dh = dice(&compile("4d6dh1").unwrap()[0]).keep_drop.unwrap();
        assert_eq!(dh.mode, KeepDropMode::DropHighest);

        let dl = dice(&compile("4d6dl1").unwrap()[0]).keep_drop.unwrap();
        assert_eq!(dl.mode, KeepDropMode::DropLowest);
    }

    #[test]
    fn keep_drop_zero_degenerates_to_none() {
        assert!(dice(&compile("2d20kh0").unwrap()[0]).keep_drop.is_none());
    }

    #[test]
    fn keep_drop_requires_a_count() {
        assert!(matches!(
            compile("2d20kh"),
            Err(FormulaError::UnrecognizedTerm(t)) if t == "2d20kh"
        ));
    }

    #[test]
    fn reroll_operator_defaults_to_equal() {
        let r = dice(&compile("4d6r1").unwrap()[0]).reroll.unwrap();
        assert_eq!(r.op, RerollOp::Eq);
        assert_eq!(r.threshold, 1);
    }

    #[test]
    fn reroll_operators_parse() {
        let le = dice(&compile("4d6r<=2").unwrap()[0]).reroll.unwrap();
        assert_eq!(le.op, RerollOp::LessEq);
        let ge = dice(&compile("4d6r>=5").unwrap()[0]).reroll.unwrap();
        assert_eq!(ge.op, RerollOp::GreaterEq);
        let lt = dice(&compile("4d6r<2").unwrap()[0]).reroll.unwrap();
        assert_eq!(lt.op, RerollOp::Less);
        let gt = dice(&compile("4d6r>5").unwrap()[0]).reroll.unwrap();
        assert_eq!(gt.op, RerollOp::Greater);
    }

    #[test]
    fn exploding_flag() {
        assert!(dice(&compile("3d6!").unwrap()[0]).explode);
        assert!(dice(&compile("4d6r<=2!").unwrap()[0]).explode);
    }

    #[test]
    fn advantage_shorthand_compiles_like_its_expansion() {
        assert_eq!(compile("adv").unwrap(), compile("2d20kh1").unwrap());
        assert_eq!(compile("dis").unwrap(), compile("2d20kl1").unwrap());
        assert_eq!(compile("ADV").unwrap(), compile("2d20kh1").unwrap());
        assert_eq!(compile("adv+5").unwrap(), compile("2d20kh1+5").unwrap());
    }

    #[test]
    fn flat_literals() {
        assert_eq!(flat(&compile("7").unwrap()[0]).value, 7.0);
        assert_eq!(flat(&compile("2.5").unwrap()[0]).value, 2.5);
        let neg = flat(&compile("-3").unwrap()[0]).clone();
        assert_eq!(neg.sign, Sign::Minus);
        assert_eq!(neg.value, 3.0);
    }

    #[test]
    fn empty_formula_rejected() {
        assert!(matches!(compile(""), Err(FormulaError::Empty)));
        assert!(matches!(compile("   "), Err(FormulaError::Empty)));
        assert!(matches!(compile("+-"), Err(FormulaError::Empty)));
    }

    #[test]
    fn dangling_signs_are_discarded() {
        // Mirrors the original term pattern: "1+-2" keeps "1" and "-2".
        let terms = compile("1+-2").unwrap();
        assert_eq!(terms.len(), 2);
        assert_eq!(flat(&terms[0]).sign, Sign::Plus);
        assert_eq!(flat(&terms[1]).sign, Sign::Minus);

        let trailing = compile("2d6+").unwrap();
        assert_eq!(trailing.len(), 1);
    }

    #[test]
    fn unrecognized_terms_rejected() {
        assert!(matches!(
            compile("2x6"),
            Err(FormulaError::UnrecognizedTerm(t)) if t == "2x6"
        ));
        assert!(matches!(
            compile("1d20+banana"),
            Err(FormulaError::UnrecognizedTerm(t)) if t == "banana"
        ));
        assert!(matches!(
            compile("1e3"),
            Err(FormulaError::UnrecognizedTerm(_))
        ));
        // Options must come in grammar order: keep/drop, reroll, explode.
        assert!(matches!(
            compile("2d6!r1"),
            Err(FormulaError::UnrecognizedTerm(_))
        ));
    }

    #[test]
    fn zero_faces_rejected() {
        assert!(matches!(
            compile("2d0"),
            Err(FormulaError::UnrecognizedTerm(t)) if t == "2d0"
        ));
    }

    #[test]
    fn impossible_reroll_rejected() {
        assert!(matches!(
            compile("1d1r=1"),
            Err(FormulaError::ImpossibleReroll { faces: 1, .. })
        ));
        assert!(matches!(
            compile("2d6r<=6"),
            Err(FormulaError::ImpossibleReroll { faces: 6, .. })
        ));
        assert!(matches!(
            compile("2d6r>=1"),
            Err(FormulaError::ImpossibleReroll { faces: 6, .. })
        ));
    }

    #[test]
    fn satisfiable_rerolls_accepted() {
        assert!(compile("2d6r<6").is_ok());
        assert!(compile("2d6r<=5").is_ok());
        // Equality against 0 never matches a face; valid no-op condition.
        assert!(compile("2d6r0").is_ok());
    }

    #[test]
    fn case_insensitive_grammar() {
        let upper = compile("2D20KH1").unwrap();
        let lower = compile("2d20kh1").unwrap();
        assert_eq!(dice(&upper[0]).count, dice(&lower[0]).count);
        assert_eq!(dice(&upper[0]).keep_drop, dice(&lower[0]).keep_drop);
    }
}
