// src/noyau/nombre.rs
//
// Nombre du noyau : entier exact OU décimal.
// - + - * sur deux entiers : exact, reste entier
// - tout mélange avec un décimal, toute division : décimal
// - puissance : multiplications répétées sous garde anti-gel

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use super::decimal::{Contexte, Decimal};
use super::delai::Garde;
use super::erreur::ErreurCalcul;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Nombre {
    Entier(BigInt),
    Decimal(Decimal),
}

impl From<i64> for Nombre {
    fn from(n: i64) -> Self {
        Nombre::Entier(BigInt::from(n))
    }
}

impl From<BigInt> for Nombre {
    fn from(n: BigInt) -> Self {
        Nombre::Entier(n)
    }
}

impl From<Decimal> for Nombre {
    fn from(d: Decimal) -> Self {
        Nombre::Decimal(d)
    }
}

impl Nombre {
    pub fn is_zero(&self) -> bool {
        match self {
            Nombre::Entier(n) => n.is_zero(),
            Nombre::Decimal(d) => d.is_zero(),
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Nombre::Entier(n) => n.is_negative(),
            Nombre::Decimal(d) => d.is_negative(),
        }
    }

    pub fn is_positive(&self) -> bool {
        !self.is_zero() && !self.is_negative()
    }

    pub fn est_entier(&self) -> bool {
        matches!(self, Nombre::Entier(_))
    }

    pub fn vers_decimal(&self) -> Decimal {
        match self {
            Nombre::Entier(n) => Decimal::from(n.clone()),
            Nombre::Decimal(d) => d.clone(),
        }
    }

    pub fn vers_rationnel(&self) -> Result<BigRational, ErreurCalcul> {
        match self {
            Nombre::Entier(n) => Ok(BigRational::from_integer(n.clone())),
            Nombre::Decimal(d) => d.vers_rationnel(),
        }
    }

    /// Flottant le plus proche (±inf si trop grand).
    pub fn vers_f64(&self) -> f64 {
        match self {
            Nombre::Entier(n) => n.to_f64().unwrap_or(f64::NAN),
            Nombre::Decimal(d) => d.vers_f64(),
        }
    }

    /* ------------------------ Opérations binaires ------------------------ */

    pub fn additionner(&self, autre: &Nombre, ctx: &Contexte) -> Result<Nombre, ErreurCalcul> {
        match (self, autre) {
            (Nombre::Entier(a), Nombre::Entier(b)) => Ok(Nombre::Entier(a + b)),
            _ => Ok(Nombre::Decimal(
                self.vers_decimal().additionner(&autre.vers_decimal(), ctx)?,
            )),
        }
    }

    pub fn soustraire(&self, autre: &Nombre, ctx: &Contexte) -> Result<Nombre, ErreurCalcul> {
        match (self, autre) {
            (Nombre::Entier(a), Nombre::Entier(b)) => Ok(Nombre::Entier(a - b)),
            _ => Ok(Nombre::Decimal(
                self.vers_decimal().soustraire(&autre.vers_decimal(), ctx)?,
            )),
        }
    }

    pub fn multiplier(&self, autre: &Nombre, ctx: &Contexte) -> Result<Nombre, ErreurCalcul> {
        match (self, autre) {
            (Nombre::Entier(a), Nombre::Entier(b)) => Ok(Nombre::Entier(a * b)),
            _ => Ok(Nombre::Decimal(
                self.vers_decimal().multiplier(&autre.vers_decimal(), ctx)?,
            )),
        }
    }

    /// Toujours décimal, même 6/3.
    pub fn diviser(&self, autre: &Nombre, ctx: &Contexte) -> Result<Nombre, ErreurCalcul> {
        Ok(Nombre::Decimal(
            self.vers_decimal().diviser(&autre.vers_decimal(), ctx)?,
        ))
    }

    /// self ^ exposant, sans opérateur de puissance natif.
    ///
    /// |exposant| = m, k = max(1, ⌈m⌉) :
    /// - k-1 multiplications (échéance vérifiée à chaque tour)
    /// - exposant décimal : × self^(m-k), reste calculé en décimal à `precision` chiffres
    /// - exposant négatif : inverse du résultat
    ///
    /// 0^0 vaut 1 entre entiers ; dès qu’un décimal s’en mêle, une base nulle
    /// sous exposant décimal (0.0^0, 0^0.0, 0^2.5) est invalide : Depassement.
    pub fn puissance(
        &self,
        exposant: &Nombre,
        ctx: &Contexte,
        garde: &mut Garde,
    ) -> Result<Nombre, ErreurCalcul> {
        if exposant.is_zero() {
            return match (self, exposant) {
                (Nombre::Entier(_), Nombre::Entier(_)) => Ok(Nombre::from(1)),
                _ if self.is_zero() => Err(ErreurCalcul::Depassement),
                _ => Ok(Nombre::Decimal(Decimal::un())),
            };
        }
        if !exposant.est_entier() && self.is_zero() {
            return Err(ErreurCalcul::Depassement);
        }

        let negatif = exposant.is_negative();
        let m = exposant.vers_rationnel()?.abs();
        let tours = m.ceil().to_integer();

        let mut courant = self.clone();
        let mut i = BigInt::one();
        while i < tours {
            // chaque tour peut coûter cher sur de grands entiers : horloge lue à chaque fois
            garde.verifier_horloge()?;
            courant = courant.multiplier(self, ctx)?;
            i += 1u32;
        }

        if let Nombre::Decimal(_) = exposant {
            let reste = m - BigRational::from_integer(tours);
            let facteur = if reste.is_zero() {
                Decimal::un()
            } else {
                self.vers_decimal().puissance_reelle(&reste, ctx)?
            };
            courant = Nombre::Decimal(courant.vers_decimal().multiplier(&facteur, ctx)?);
        }

        if negatif {
            courant = Nombre::Decimal(Decimal::un().diviser(&courant.vers_decimal(), ctx)?);
        }

        Ok(courant)
    }
}
