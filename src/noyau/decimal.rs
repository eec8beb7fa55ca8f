// src/noyau/decimal.rs
//
// Décimal à précision arbitraire : valeur = coefficient × 10^exposant.
// - coefficient BigInt exact, jamais de flottant binaire dans la représentation
// - chaque opération arithmétique arrondit (demi-pair) à `precision` chiffres
//   significatifs, puis vérifie l’exposant ajusté contre `exposant_max`
// - les littéraux et les conversions depuis f64 sont exacts (pas d’arrondi)

use std::cmp::Ordering;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{Float, One, Signed, ToPrimitive, Zero};

use super::config::Config;
use super::erreur::ErreurCalcul;

/// Contexte arithmétique (extrait de Config).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contexte {
    pub precision: u32,
    pub exposant_max: i64,
}

impl From<&Config> for Contexte {
    fn from(c: &Config) -> Self {
        Self {
            precision: c.precision.max(1),
            exposant_max: c.exposant_max.max(1),
        }
    }
}

impl Default for Contexte {
    fn default() -> Self {
        Contexte::from(&Config::default())
    }
}

impl Contexte {
    /// Plus petit exposant représentable (sous-normaux compris).
    fn exposant_min(&self) -> i64 {
        -self.exposant_max - (i64::from(self.precision) - 1)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decimal {
    coefficient: BigInt,
    exposant: i64,
}

/* ------------------------ Outils BigInt ------------------------ */

pub(crate) fn pow10(n: u32) -> BigInt {
    BigInt::from(10u32).pow(n)
}

fn pow10_i64(n: i64) -> Result<BigInt, ErreurCalcul> {
    let n = u32::try_from(n).map_err(|_| ErreurCalcul::Depassement)?;
    Ok(pow10(n))
}

/// Nombre de chiffres décimaux de |n| (0 compte pour 1 chiffre).
pub(crate) fn nb_chiffres(n: &BigInt) -> i64 {
    if n.is_zero() {
        return 1;
    }
    n.magnitude().to_str_radix(10).len() as i64
}

/// n / 10^k arrondi demi-pair (k > 0).
fn arrondi_demi_pair(n: &BigInt, k: i64) -> Result<BigInt, ErreurCalcul> {
    let d = pow10_i64(k)?;
    let q = n / &d;
    let r = n % &d;

    let double = r.abs() * 2u32;
    let monter = match double.cmp(&d) {
        Ordering::Greater => true,
        Ordering::Equal => !(&q % 2u32).is_zero(),
        Ordering::Less => false,
    };

    Ok(match (monter, n.is_negative()) {
        (false, _) => q,
        (true, false) => q + 1u32,
        (true, true) => q - 1u32,
    })
}

/* ------------------------ Séries scalées (ln, exp) ------------------------ */

/// atanh(z) en entier scalé (troncature), z = z_s / échelle, 0 <= z <= 1/3 :
/// atanh(z) = z + z^3/3 + z^5/5 + ...
fn atanh_scaled(z: &BigInt, echelle: &BigInt) -> BigInt {
    let z2 = z * z / echelle;

    let mut puissance = z.clone();
    let mut somme = BigInt::zero();
    let mut k: u32 = 1;
    while !puissance.is_zero() {
        somme += &puissance / k;
        puissance = puissance * &z2 / echelle;
        k += 2;
    }
    somme
}

/// ln(m) scalé pour 1 <= m < 10 :
/// m = 2^k·u avec 1 <= u < 2, ln u = 2·atanh((u-1)/(u+1)).
fn ln_mantisse_scaled(mut m: BigInt, echelle: &BigInt, ln2: &BigInt) -> BigInt {
    let deux = echelle * 2u32;
    let mut k: u32 = 0;
    while m >= deux {
        m /= 2u32;
        k += 1;
    }
    let z = (&m - echelle) * echelle / (&m + echelle);
    ln2 * k + atanh_scaled(&z, echelle) * 2u32
}

/// exp(f) scalé (Taylor), 0 <= f < ln 10.
fn exp_scaled(f: &BigInt, echelle: &BigInt) -> BigInt {
    let mut terme = echelle.clone();
    let mut somme = echelle.clone();
    let mut n: u32 = 1;
    while !terme.is_zero() {
        terme = terme * f / echelle / n;
        somme += &terme;
        n += 1;
    }
    somme
}

impl Decimal {
    pub fn new(coefficient: BigInt, exposant: i64) -> Self {
        Self {
            coefficient,
            exposant,
        }
    }

    pub fn zero() -> Self {
        Self::new(BigInt::zero(), 0)
    }

    pub fn un() -> Self {
        Self::new(BigInt::one(), 0)
    }

    pub fn coefficient(&self) -> &BigInt {
        &self.coefficient
    }

    pub fn exposant(&self) -> i64 {
        self.exposant
    }

    pub fn is_zero(&self) -> bool {
        self.coefficient.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.coefficient.is_negative()
    }

    /// Exposant du chiffre de tête (notation scientifique).
    pub fn ajuste(&self) -> i64 {
        self.exposant + nb_chiffres(&self.coefficient) - 1
    }

    pub fn oppose(&self) -> Self {
        Self::new(-&self.coefficient, self.exposant)
    }

    /// Ramène à `precision` chiffres, borne les exposants.
    pub fn arrondir(mut self, ctx: &Contexte) -> Result<Decimal, ErreurCalcul> {
        let precision = i64::from(ctx.precision);

        let chiffres = nb_chiffres(&self.coefficient);
        if chiffres > precision {
            let retire = chiffres - precision;
            self.coefficient = arrondi_demi_pair(&self.coefficient, retire)?;
            self.exposant = self
                .exposant
                .checked_add(retire)
                .ok_or(ErreurCalcul::Depassement)?;

            // 999…9 arrondi vers 1000…0 : un chiffre de trop, exact
            if nb_chiffres(&self.coefficient) > precision {
                self.coefficient /= 10u32;
                self.exposant += 1;
            }
        }

        // sous-dépassement : on tronque vers l’exposant minimal
        let emin = ctx.exposant_min();
        if self.exposant < emin {
            let retire = emin - self.exposant;
            self.coefficient = if retire > nb_chiffres(&self.coefficient) + 1 {
                BigInt::zero()
            } else {
                arrondi_demi_pair(&self.coefficient, retire)?
            };
            self.exposant = emin;
        }

        if !self.coefficient.is_zero() && self.ajuste() > ctx.exposant_max {
            return Err(ErreurCalcul::Depassement);
        }

        Ok(self)
    }

    /* ------------------------ Arithmétique ------------------------ */

    pub fn additionner(&self, autre: &Decimal, ctx: &Contexte) -> Result<Decimal, ErreurCalcul> {
        if autre.is_zero() && self.is_zero() {
            return Ok(Decimal::new(BigInt::zero(), self.exposant.min(autre.exposant)));
        }
        if autre.is_zero() {
            return self.clone().arrondir(ctx);
        }
        if self.is_zero() {
            return autre.clone().arrondir(ctx);
        }

        // Opérande négligeable : remplacé par un “témoin” de même signe, sous
        // la granularité d’arrondi de l’autre (évite d’aligner sur 10^énorme).
        let marge = i64::from(ctx.precision) + 2;
        let (a, b) = match self.ajuste().cmp(&autre.ajuste()) {
            Ordering::Less => (autre, self),
            _ => (self, autre),
        };
        let plancher = (a.ajuste() - marge).min(a.exposant);
        let temoin;
        let b = if b.ajuste() < plancher {
            let signe = if b.is_negative() { -1 } else { 1 };
            temoin = Decimal::new(BigInt::from(signe), plancher - 1);
            &temoin
        } else {
            b
        };

        let exposant = a.exposant.min(b.exposant);
        let ca = &a.coefficient * pow10_i64(a.exposant - exposant)?;
        let cb = &b.coefficient * pow10_i64(b.exposant - exposant)?;

        Decimal::new(ca + cb, exposant).arrondir(ctx)
    }

    pub fn soustraire(&self, autre: &Decimal, ctx: &Contexte) -> Result<Decimal, ErreurCalcul> {
        self.additionner(&autre.oppose(), ctx)
    }

    pub fn multiplier(&self, autre: &Decimal, ctx: &Contexte) -> Result<Decimal, ErreurCalcul> {
        let exposant = self
            .exposant
            .checked_add(autre.exposant)
            .ok_or(ErreurCalcul::Depassement)?;
        Decimal::new(&self.coefficient * &autre.coefficient, exposant).arrondir(ctx)
    }

    /// Quotient arrondi à `precision` chiffres.
    /// Exact : exposant ramené au plus près de l’exposant idéal (ea - eb).
    pub fn diviser(&self, autre: &Decimal, ctx: &Contexte) -> Result<Decimal, ErreurCalcul> {
        if autre.is_zero() {
            return Err(ErreurCalcul::DivisionParZero);
        }

        let ideal = self
            .exposant
            .checked_sub(autre.exposant)
            .ok_or(ErreurCalcul::Depassement)?;

        if self.is_zero() {
            return Decimal::new(BigInt::zero(), ideal).arrondir(ctx);
        }

        let negatif = self.is_negative() != autre.is_negative();
        let na = self.coefficient.abs();
        let nb = autre.coefficient.abs();

        // au moins precision+1 chiffres au quotient
        let decalage = (i64::from(ctx.precision) + nb_chiffres(&nb) - nb_chiffres(&na) + 1).max(0);
        let numerateur = na * pow10_i64(decalage)?;
        let mut q = &numerateur / &nb;
        let r = &numerateur % &nb;
        let mut exposant = ideal - decalage;

        if r.is_zero() {
            while exposant < ideal && (&q % 10u32).is_zero() && !q.is_zero() {
                q /= 10u32;
                exposant += 1;
            }
        } else {
            // chiffre collant : départage correctement les égalités à l’arrondi
            q = q * 10u32 + 1u32;
            exposant -= 1;
        }

        if negatif {
            q = -q;
        }
        Decimal::new(q, exposant).arrondir(ctx)
    }

    /// self^r, r rationnel quelconque, self > 0 ; jamais de flottant binaire.
    ///
    /// self = m·10^a (1 <= m < 10), y = r·(ln m + a·ln 10) = k·ln 10 + f avec
    /// 0 <= f < ln 10, d’où self^r = exp(f)·10^k. Calcul sur entiers scalés à
    /// `precision` + 12 chiffres de garde (+ ceux de a), arrondi final demi-pair.
    pub fn puissance_reelle(
        &self,
        r: &BigRational,
        ctx: &Contexte,
    ) -> Result<Decimal, ErreurCalcul> {
        // base négative ou nulle : opération invalide
        if !self.coefficient.is_positive() {
            return Err(ErreurCalcul::Depassement);
        }

        let a = self.ajuste();
        let w = i64::from(ctx.precision) + 12 + nb_chiffres(&BigInt::from(a));
        let echelle = pow10_i64(w)?;

        let decalage = w - (nb_chiffres(&self.coefficient) - 1);
        let m = if decalage >= 0 {
            &self.coefficient * pow10_i64(decalage)?
        } else {
            &self.coefficient / pow10_i64(-decalage)?
        };

        let ln2 = atanh_scaled(&(&echelle / 3u32), &echelle) * 2u32;
        // ln 10 = 3·ln 2 + ln(5/4), ln(5/4) = 2·atanh(1/9)
        let ln10 = &ln2 * 3u32 + atanh_scaled(&(&echelle / 9u32), &echelle) * 2u32;

        let ln_base = ln_mantisse_scaled(m, &echelle, &ln2) + &ln10 * BigInt::from(a);
        let y = ln_base * r.numer() / r.denom();

        let mut k = &y / &ln10;
        let mut f = y - &k * &ln10;
        if f.is_negative() {
            k -= 1u32;
            f += &ln10;
        }

        let k = k.to_i64().ok_or(ErreurCalcul::Depassement)?;
        let exposant = k.checked_sub(w).ok_or(ErreurCalcul::Depassement)?;
        Decimal::new(exp_scaled(&f, &echelle), exposant).arrondir(ctx)
    }

    /* ------------------------ Conversions ------------------------ */

    /// Valeur exacte en rationnel.
    pub fn vers_rationnel(&self) -> Result<BigRational, ErreurCalcul> {
        if self.exposant >= 0 {
            let n = &self.coefficient * pow10_i64(self.exposant)?;
            Ok(BigRational::from_integer(n))
        } else {
            let d = pow10_i64(-self.exposant)?;
            Ok(BigRational::new(self.coefficient.clone(), d))
        }
    }

    /// Conversion exacte d’un flottant fini (aucun arrondi).
    pub fn depuis_f64(x: f64) -> Option<Decimal> {
        if !x.is_finite() {
            return None;
        }

        let (mut mantisse, mut exp2, signe) = Float::integer_decode(x);
        if mantisse == 0 {
            return Some(Decimal::zero());
        }
        while exp2 < 0 && mantisse % 2 == 0 {
            mantisse /= 2;
            exp2 += 1;
        }

        let m = BigInt::from(mantisse) * BigInt::from(signe);
        if exp2 >= 0 {
            Some(Decimal::new(m << exp2 as usize, 0))
        } else {
            // m·2^-k = m·5^k / 10^k
            let k = u32::from(exp2.unsigned_abs());
            Some(Decimal::new(m * BigInt::from(5u32).pow(k), -i64::from(k)))
        }
    }

    /// Flottant le plus proche (±inf si hors plage).
    pub fn vers_f64(&self) -> f64 {
        format!("{}e{}", self.coefficient, self.exposant)
            .parse::<f64>()
            .unwrap_or(f64::NAN)
    }
}

impl From<BigInt> for Decimal {
    fn from(n: BigInt) -> Self {
        Decimal::new(n, 0)
    }
}
