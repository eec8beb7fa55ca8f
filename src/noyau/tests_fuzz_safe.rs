//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée (5 niveaux, 4 valeurs par niveau, 3 chiffres par nombre)
//! - `^` rare (1 opérateur sur 10 au plus) : il provoque la plupart des délais dépassés
//! - délai court par appel + budget temps global
//! - invariant clé : une expression bien formée n’est JAMAIS InvalidExpression,
//!   une expression abîmée l’est TOUJOURS

use std::time::{Duration, Instant};

use super::{calculate_with, Config, StatusCode};

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    /// Entier dans [a, b[.
    fn entre(&mut self, a: u32, b: u32) -> u32 {
        a + self.pick(b - a)
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

fn config_fuzz() -> Config {
    Config::default().with_delai(Duration::from_millis(20))
}

/* ------------------------ Génération d’expressions (bornée) ------------------------ */

const FONCTIONS: [&str; 6] = ["sin", "cos", "tan", "cot", "ln", "log"];
const OPERATEURS: &str = "+-*/^";

const MAX_VALEURS: u32 = 5;
const MAX_PROFONDEUR: u32 = 5;
const MAX_UNAIRES: u32 = 5;
const MAX_ENTIER: u32 = 1000;

/// Liste de jetons (texte) d’une expression bien formée.
fn gen_expr(rng: &mut Rng, profondeur: u32) -> Vec<String> {
    let mut out = Vec::new();
    let n = rng.entre(1, MAX_VALEURS);

    for k in 0..n {
        if rng.coin() {
            for _ in 0..rng.entre(1, MAX_UNAIRES) {
                out.push(if rng.coin() { "+" } else { "-" }.to_string());
            }
        }

        // trop profond : plus de fonction ni de sous-expression
        let choix = if profondeur >= MAX_PROFONDEUR {
            rng.pick(2)
        } else {
            rng.pick(4)
        };
        match choix {
            0 => out.push(rng.pick(MAX_ENTIER).to_string()),
            1 => out.push(format!(
                "{}.{}",
                rng.pick(MAX_ENTIER),
                rng.pick(MAX_ENTIER)
            )),
            2 => {
                out.push(FONCTIONS[rng.pick(FONCTIONS.len() as u32) as usize].to_string());
                out.push("(".to_string());
                out.extend(gen_expr(rng, profondeur + 1));
                out.push(")".to_string());
            }
            _ => {
                let (o, f) = if rng.coin() { ("(", ")") } else { ("{", "}") };
                out.push(o.to_string());
                out.extend(gen_expr(rng, profondeur + 1));
                out.push(f.to_string());
            }
        }

        if k + 1 < n {
            let sans_puissance = u32::from(rng.pick(10) != 0);
            let i = rng.pick(OPERATEURS.len() as u32 - sans_puissance) as usize;
            out.push(OPERATEURS[i..i + 1].to_string());
        }
    }

    out
}

/// Abîme une expression bien formée (toujours de façon détectable).
fn injecter_erreur(rng: &mut Rng, jetons: &mut Vec<String>) {
    let idx = rng.pick(jetons.len() as u32) as usize;
    let t = jetons[idx].clone();

    if FONCTIONS.contains(&t.as_str()) {
        // nom de fonction inconnu
        let lettre = char::from(b'a' + rng.pick(26) as u8);
        jetons[idx].push(lettre);
    } else if idx == jetons.len() - 1 {
        // opérateur final
        let i = rng.pick(OPERATEURS.len() as u32) as usize;
        jetons.push(OPERATEURS[i..i + 1].to_string());
    } else if matches!(t.as_str(), "(" | ")" | "{" | "}") {
        // parenthèse orpheline
        jetons.remove(idx);
    } else if t.contains('.') {
        // second point décimal
        jetons[idx].push_str(&format!(".{}", rng.pick(MAX_ENTIER)));
    } else if t.chars().all(|c| c.is_ascii_digit()) {
        // opérateur binaire là où un opérande est attendu
        let i = rng.pick(3) as usize;
        jetons.insert(idx, "*/^"[i..i + 1].to_string());
    } else {
        jetons.push("*".to_string());
    }
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_bien_formees_jamais_invalides() {
    let t0 = Instant::now();
    let max = Duration::from_secs(15);
    let config = config_fuzz();

    let mut rng = Rng::new(0xC0FFEE_u64);

    let mut seen_ok = 0usize;
    let mut seen_err = 0usize;

    for _ in 0..300 {
        budget(t0, max);

        let expr = gen_expr(&mut rng, 0).concat();
        let (s, v) = calculate_with(&expr, &config);

        assert_ne!(s, StatusCode::InvalidExpression, "expr={expr:?}");
        assert_eq!(s.is_success(), v.is_some(), "expr={expr:?}");
        if s.is_success() {
            seen_ok += 1;
        } else {
            seen_err += 1;
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne “balaye” rien.
    assert!(seen_ok > 30, "trop peu de succès: {seen_ok}");
    assert!(seen_err > 0, "aucune erreur vue: fuzz trop “sage”");
}

#[test]
fn fuzz_safe_erreurs_injectees_toujours_invalides() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);
    let config = config_fuzz();

    let mut rng = Rng::new(0xBADC0DE_u64);

    for _ in 0..300 {
        budget(t0, max);

        let mut jetons = gen_expr(&mut rng, 0);
        injecter_erreur(&mut rng, &mut jetons);
        let expr = jetons.concat();

        let (s, v) = calculate_with(&expr, &config);
        assert_eq!(s, StatusCode::InvalidExpression, "expr={expr:?}");
        assert!(v.is_none());
    }
}

#[test]
fn fuzz_safe_determinisme() {
    let t0 = Instant::now();
    let max = Duration::from_secs(15);
    let config = config_fuzz();

    // Même seed => mêmes expressions => mêmes sorties
    let mut a = Rng::new(0x5EED_u64);
    let mut b = a.clone();

    for _ in 0..150 {
        budget(t0, max);

        let ea = gen_expr(&mut a, 0).concat();
        let eb = gen_expr(&mut b, 0).concat();
        assert_eq!(ea, eb);

        let ra = calculate_with(&ea, &config);
        let rb = calculate_with(&eb, &config);

        // seul le délai dépend de la machine
        if ra.0 == StatusCode::TimeoutError || rb.0 == StatusCode::TimeoutError {
            continue;
        }
        assert_eq!(ra, rb, "expr={ea:?}");
    }
}

#[test]
fn fuzz_safe_espaces_neutres() {
    let t0 = Instant::now();
    let max = Duration::from_secs(15);
    let config = config_fuzz();

    let mut rng = Rng::new(0xFEED_u64);

    for _ in 0..150 {
        budget(t0, max);

        let jetons = gen_expr(&mut rng, 0);
        let colle = jetons.concat();
        let aere = format!(" {} =", jetons.join(" "));

        let r1 = calculate_with(&colle, &config);
        let r2 = calculate_with(&aere, &config);

        if r1.0 == StatusCode::TimeoutError || r2.0 == StatusCode::TimeoutError {
            continue;
        }
        assert_eq!(r1, r2, "expr={colle:?}");
    }
}
