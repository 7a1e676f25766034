use std::{iter::Peekable, str::CharIndices, str::FromStr};

use rust_decimal::Decimal;

use super::{
    number::NumberFormat,
    token::{Operator, Token},
};

/// Single pass scanner. Yields each token with the byte offset it starts at.
pub(crate) struct Lexer<'src> {
    src: &'src str,
    chars: Peekable<CharIndices<'src>>,
    format: NumberFormat,
}

impl<'src> Iterator for Lexer<'src> {
    type Item = (usize, Token<'src>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (off, c) = self.chars.next()?;

            let token = match c {
                '(' => Token::LParen,
                ')' => Token::RParen,
                c if c.is_whitespace() => continue,
                c if c.is_ascii_digit() => self.read_number(off),
                c if c.is_alphabetic() => self.read_id(off),
                c => match Operator::from_symbol(c) {
                    Some(op) => Token::Op(op),
                    None => Token::Invalid(c),
                },
            };

            return Some((off, token));
        }
    }
}

impl<'src> Lexer<'src> {
    pub fn new(src: &'src str, format: NumberFormat) -> Self {
        Self {
            src,
            chars: src.char_indices().peekable(),
            format,
        }
    }

    #[inline]
    fn bump(&mut self) {
        let _ = self.chars.next();
    }

    fn slice_until<P>(&mut self, from_off: usize, predicate: P) -> &'src str
    where
        P: Fn(char) -> bool,
    {
        while let Some(&(off, c)) = self.chars.peek() {
            if predicate(c) {
                return &self.src[from_off..off];
            }
            self.bump();
        }
        &self.src[from_off..self.src.len()]
    }

    fn read_number(&mut self, from_off: usize) -> Token<'src> {
        let format = self.format;
        let s = self.slice_until(from_off, |c| !format.is_literal_part(c));

        match Decimal::from_str(&format.normalize(s)) {
            Ok(v) => Token::Number(v),
            Err(_) => Token::BadNumber(s),
        }
    }

    fn read_id(&mut self, from_off: usize) -> Token<'src> {
        Token::Id(self.slice_until(from_off, |c| !c.is_alphabetic()))
    }
}

#[cfg(test)]
mod test {
    use rust_decimal_macros::dec;

    use super::{
        super::{
            number::NumberFormat,
            token::{Operator, Token},
        },
        Lexer,
    };

    fn tokenize_str(s: &str) -> Vec<Token> {
        Lexer::new(s, NumberFormat::invariant()).map(|(_, t)| t).collect()
    }

    #[test]
    fn read_number() {
        let tokens = tokenize_str("48$7 1024 \n9\n8");
        let expected = &[
            Token::Number(dec!(48)),
            Token::Invalid('$'),
            Token::Number(dec!(7)),
            Token::Number(dec!(1024)),
            Token::Number(dec!(9)),
            Token::Number(dec!(8)),
        ];

        assert_eq!(tokens, expected);
    }

    #[test]
    fn read_decimal_number() {
        assert_eq!(tokenize_str("2.75"), &[Token::Number(dec!(2.75))]);
        assert_eq!(tokenize_str("5."), &[Token::Number(dec!(5))]);
        assert_eq!(tokenize_str("1.2.3"), &[Token::BadNumber("1.2.3")]);
        assert_eq!(tokenize_str(".5"), &[Token::Invalid('.'), Token::Number(dec!(5))]);
    }

    #[test]
    fn read_expression() {
        let tokens: Vec<_> = Lexer::new("(ab + 3)*c", NumberFormat::invariant()).collect();
        let expected = vec![
            (0, Token::LParen),
            (1, Token::Id("ab")),
            (4, Token::Op(Operator::Add)),
            (6, Token::Number(dec!(3))),
            (7, Token::RParen),
            (8, Token::Op(Operator::Multiply)),
            (9, Token::Id("c")),
        ];

        assert_eq!(tokens, expected);
    }

    #[test]
    fn identifiers_stop_at_digits() {
        let tokens = tokenize_str("x2-y");
        let expected = &[
            Token::Id("x"),
            Token::Number(dec!(2)),
            Token::Op(Operator::Subtract),
            Token::Id("y"),
        ];

        assert_eq!(tokens, expected);
    }

    #[test]
    fn unicode_identifier() {
        assert_eq!(tokenize_str("größe"), &[Token::Id("größe")]);
    }

    #[test]
    fn read_number_with_culture() {
        let format = NumberFormat::new(',', Some(' ')).unwrap();
        let tokens: Vec<_> = Lexer::new("5 000,67 - 2,5", format)
            .map(|(_, t)| t)
            .collect();
        let expected = vec![
            Token::Number(dec!(5000.67)),
            Token::Op(Operator::Subtract),
            Token::Number(dec!(2.5)),
        ];

        assert_eq!(tokens, expected);
    }

    #[test]
    fn whitespace_only() {
        assert!(tokenize_str(" \t\n ").is_empty());
    }
}
