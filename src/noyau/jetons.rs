// src/noyau/jetons.rs

use std::fmt;

use num_bigint::BigInt;
use num_traits::Zero;

use super::decimal::{pow10, Decimal};
use super::delai::Garde;
use super::erreur::{ErreurCalcul, Raison};
use super::nombre::Nombre;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operateur {
    Plus,
    Moins,
    Fois,
    Divise,
    Puissance, // ^
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fonction {
    Sin,
    Cos,
    Tan,
    Cot,
    Ln,  // logarithme népérien
    Log, // base 10
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Parenthese {
    RondeOuvrante,
    RondeFermante,
    AccoladeOuvrante,
    AccoladeFermante,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Jeton {
    Nombre(Nombre),
    Operateur(Operateur),
    Fonction(Fonction),
    Parenthese(Parenthese),
}

impl Operateur {
    pub fn symbole(self) -> char {
        match self {
            Operateur::Plus => '+',
            Operateur::Moins => '-',
            Operateur::Fois => '*',
            Operateur::Divise => '/',
            Operateur::Puissance => '^',
        }
    }

    /// + et - peuvent aussi être unaires.
    pub fn est_unaire(self) -> bool {
        matches!(self, Operateur::Plus | Operateur::Moins)
    }
}

impl Fonction {
    pub fn nom(self) -> &'static str {
        match self {
            Fonction::Sin => "sin",
            Fonction::Cos => "cos",
            Fonction::Tan => "tan",
            Fonction::Cot => "cot",
            Fonction::Ln => "ln",
            Fonction::Log => "log",
        }
    }
}

impl fmt::Display for Fonction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.nom())
    }
}

impl Parenthese {
    pub fn est_ouvrante(self) -> bool {
        matches!(
            self,
            Parenthese::RondeOuvrante | Parenthese::AccoladeOuvrante
        )
    }

    /// Fermante du même style.
    pub fn fermante(self) -> Parenthese {
        match self {
            Parenthese::RondeOuvrante | Parenthese::RondeFermante => Parenthese::RondeFermante,
            Parenthese::AccoladeOuvrante | Parenthese::AccoladeFermante => {
                Parenthese::AccoladeFermante
            }
        }
    }

    pub fn symbole(self) -> char {
        match self {
            Parenthese::RondeOuvrante => '(',
            Parenthese::RondeFermante => ')',
            Parenthese::AccoladeOuvrante => '{',
            Parenthese::AccoladeFermante => '}',
        }
    }
}

/// Jetons d’un seul caractère : + - * / ^ ( ) { }
fn jeton_simple(c: char) -> Option<Jeton> {
    let j = match c {
        '+' => Jeton::Operateur(Operateur::Plus),
        '-' => Jeton::Operateur(Operateur::Moins),
        '*' => Jeton::Operateur(Operateur::Fois),
        '/' => Jeton::Operateur(Operateur::Divise),
        '^' => Jeton::Operateur(Operateur::Puissance),
        '(' => Jeton::Parenthese(Parenthese::RondeOuvrante),
        ')' => Jeton::Parenthese(Parenthese::RondeFermante),
        '{' => Jeton::Parenthese(Parenthese::AccoladeOuvrante),
        '}' => Jeton::Parenthese(Parenthese::AccoladeFermante),
        _ => return None,
    };
    Some(j)
}

fn est_separateur(c: char) -> bool {
    c.is_ascii_digit() || jeton_simple(c).is_some()
}

/// Tokenize une expression infixe.
///
/// - espaces retirés AVANT la lecture : `1 2` vaut `12`, `s in(0)` vaut `sin(0)`
/// - `=` final optionnel ignoré
/// - mots-clés sin tan cos cot ln log (insensibles à la casse), 2 caractères d’avance au plus
/// - nombres : suite maximale de chiffres et de points ; 0 point => entier, 1 point => décimal
///
/// Un seul jeton non reconnu rejette toute l’expression.
pub fn tokenize(s: &str, garde: &mut Garde) -> Result<Vec<Jeton>, ErreurCalcul> {
    let mut chars: Vec<char> = s.chars().filter(|c| !c.is_whitespace()).collect();
    if chars.last() == Some(&'=') {
        chars.pop();
    }

    let mut i: usize = 0;
    let mut out = Vec::new();

    while let Some(jeton) = prochain_jeton(&chars, &mut i, garde)? {
        out.push(jeton);
    }

    Ok(out)
}

/// None = fin d’entrée.
fn prochain_jeton(
    chars: &[char],
    i: &mut usize,
    garde: &mut Garde,
) -> Result<Option<Jeton>, ErreurCalcul> {
    let Some(&c) = chars.get(*i) else {
        return Ok(None);
    };
    garde.verifier()?;

    if let Some(j) = jeton_simple(c) {
        *i += 1;
        return Ok(Some(j));
    }

    if let Some((f, longueur)) = mot_cle(&chars[*i..]) {
        *i += longueur;
        return Ok(Some(Jeton::Fonction(f)));
    }

    if c.is_ascii_digit() || c == '.' {
        return lire_nombre(chars, i, garde).map(Some);
    }

    // jeton inconnu : le caractère fautif + la suite jusqu’au prochain séparateur
    let debut = *i;
    *i += 1;
    while *i < chars.len() && !est_separateur(chars[*i]) {
        garde.verifier()?;
        *i += 1;
    }
    let texte: String = chars[debut..*i].iter().collect();
    Err(Raison::JetonInconnu(texte).into())
}

/// Reconnaissance par préfixe : `co` => cos/cot, `l` => ln/log.
fn mot_cle(reste: &[char]) -> Option<(Fonction, usize)> {
    let c = |k: usize| reste.get(k).map(|c| c.to_ascii_lowercase());

    match (c(0)?, c(1), c(2)) {
        ('s', Some('i'), Some('n')) => Some((Fonction::Sin, 3)),
        ('t', Some('a'), Some('n')) => Some((Fonction::Tan, 3)),
        ('c', Some('o'), Some('s')) => Some((Fonction::Cos, 3)),
        ('c', Some('o'), Some('t')) => Some((Fonction::Cot, 3)),
        ('l', Some('n'), _) => Some((Fonction::Ln, 2)),
        ('l', Some('o'), Some('g')) => Some((Fonction::Log, 3)),
        _ => None,
    }
}

fn lire_nombre(chars: &[char], i: &mut usize, garde: &mut Garde) -> Result<Jeton, ErreurCalcul> {
    let debut = *i;
    let mut points = 0usize;

    while *i < chars.len() && (chars[*i].is_ascii_digit() || chars[*i] == '.') {
        garde.verifier()?;
        if chars[*i] == '.' {
            points += 1;
        }
        *i += 1;
    }

    let texte = &chars[debut..*i];
    if points >= 2 || texte == ['.'] {
        return Err(Raison::NombreInvalide(texte.iter().collect()).into());
    }

    convertir_litteral(texte, garde).map(Jeton::Nombre)
}

/// Conversion positionnelle exacte (pas de parse générique, pas de flottant).
fn convertir_litteral(texte: &[char], garde: &mut Garde) -> Result<Nombre, ErreurCalcul> {
    let mut gauche = BigInt::zero();
    let mut droite = BigInt::zero();
    let mut chiffres_droite: u32 = 0;
    let mut point_vu = false;

    for &c in texte {
        garde.verifier()?;

        if c == '.' {
            point_vu = true;
            continue;
        }

        let chiffre = c as u32 - '0' as u32;
        if !point_vu {
            gauche = gauche * 10u32 + chiffre;
        } else {
            droite = droite * 10u32 + chiffre;
            chiffres_droite += 1;
        }
    }

    if !point_vu {
        return Ok(Nombre::Entier(gauche));
    }

    let coefficient = gauche * pow10(chiffres_droite) + droite;
    Ok(Nombre::Decimal(Decimal::new(
        coefficient,
        -i64::from(chiffres_droite),
    )))
}

/// Format utilitaire (debug/“démarche”) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Jeton]) -> String {
    let mut out = Vec::with_capacity(tokens.len());
    for t in tokens {
        let s = match t {
            Jeton::Nombre(n) => n.to_string(),
            Jeton::Operateur(op) => op.symbole().to_string(),
            Jeton::Fonction(f) => f.nom().to_string(),
            Jeton::Parenthese(p) => p.symbole().to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
