// src/noyau/format.rs
//
// Affichage des nombres du noyau.
// - Entier : base 10, tel quel
// - Décimal : forme « arithmétique décimale » classique
//     notation simple si exposant <= 0 et exposant ajusté >= -6,
//     sinon scientifique (1.5E+7, 1E-7) ;
//     les zéros du coefficient sont conservés (1.5*2 => 3.0)

use std::fmt;

use num_traits::Signed;

use super::decimal::Decimal;
use super::nombre::Nombre;

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chiffres = self.coefficient().abs().to_string();
        let n = chiffres.len() as i64;
        let exposant = self.exposant();
        let gauche = exposant + n;

        // position du point décimal dans `chiffres`
        let point = if exposant <= 0 && gauche > -6 { gauche } else { 1 };

        if self.is_negative() {
            f.write_str("-")?;
        }

        if point <= 0 {
            f.write_str("0.")?;
            for _ in 0..(-point) {
                f.write_str("0")?;
            }
            f.write_str(&chiffres)?;
        } else if point >= n {
            f.write_str(&chiffres)?;
            for _ in 0..(point - n) {
                f.write_str("0")?;
            }
        } else {
            let (entiere, fraction) = chiffres.split_at(point as usize);
            write!(f, "{entiere}.{fraction}")?;
        }

        if gauche != point {
            write!(f, "E{:+}", gauche - point)?;
        }
        Ok(())
    }
}

impl fmt::Display for Nombre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Nombre::Entier(n) => write!(f, "{n}"),
            Nombre::Decimal(d) => write!(f, "{d}"),
        }
    }
}
