// src/noyau/fonctions.rs
//
// sin cos tan cot ln log : calcul en flottant, résultat converti EXACTEMENT
// en décimal (aucun arrondi supplémentaire à la conversion).
//
// Indéfinis (ValueError) :
// - ln / log d’un argument <= 0
// - tan quand |cos x| <= ε (asymptote), cot quand |sin x| <= ε

use std::f64::consts::{LN_10, LN_2};

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

use super::decimal::Decimal;
use super::erreur::ErreurCalcul;
use super::jetons::Fonction;
use super::nombre::Nombre;

/// Tolérance d’asymptote pour tan/cot.
const TOLERANCE_POLE: f64 = f64::EPSILON;

pub fn appliquer_fonction(f: Fonction, x: &Nombre) -> Result<Nombre, ErreurCalcul> {
    let hors_domaine = || ErreurCalcul::Domaine {
        fonction: f,
        argument: x.to_string(),
    };

    let y = match f {
        Fonction::Sin => angle(x)?.sin(),
        Fonction::Cos => angle(x)?.cos(),
        Fonction::Tan => {
            let a = angle(x)?;
            if a.cos().abs() <= TOLERANCE_POLE {
                return Err(hors_domaine());
            }
            a.tan()
        }
        Fonction::Cot => {
            let a = angle(x)?;
            if a.sin().abs() <= TOLERANCE_POLE {
                return Err(hors_domaine());
            }
            1.0 / a.tan()
        }
        Fonction::Ln => {
            if !x.is_positive() {
                return Err(hors_domaine());
            }
            ln_positif(x)
        }
        Fonction::Log => {
            if !x.is_positive() {
                return Err(hors_domaine());
            }
            let v = x.vers_f64();
            if v.is_normal() {
                v.log10()
            } else {
                ln_positif(x) / LN_10
            }
        }
    };

    Decimal::depuis_f64(y)
        .map(Nombre::Decimal)
        .ok_or(ErreurCalcul::Depassement)
}

/// Argument trigonométrique en radians ; hors plage f64 => dépassement.
fn angle(x: &Nombre) -> Result<f64, ErreurCalcul> {
    let a = x.vers_f64();
    if a.is_finite() {
        Ok(a)
    } else {
        Err(ErreurCalcul::Depassement)
    }
}

/// ln(x), x > 0, y compris hors de la plage des f64
/// (ln(c·10^e) = ln(c) + e·ln 10, ln(m·2^k) = ln(m) + k·ln 2).
fn ln_positif(x: &Nombre) -> f64 {
    let v = x.vers_f64();
    if v.is_normal() {
        return v.ln();
    }

    let (coefficient, exposant) = match x {
        Nombre::Entier(n) => (n.clone(), 0),
        Nombre::Decimal(d) => (d.coefficient().clone(), d.exposant()),
    };
    ln_entier(&coefficient) + exposant as f64 * LN_10
}

fn ln_entier(n: &BigInt) -> f64 {
    let n = n.abs();
    let bits = n.bits();
    if bits <= 1000 {
        return n.to_f64().map(f64::ln).unwrap_or(f64::NAN);
    }
    let decalage = bits - 64;
    let tete: BigInt = n >> decalage;
    tete.to_f64().map(f64::ln).unwrap_or(f64::NAN) + decalage as f64 * LN_2
}
