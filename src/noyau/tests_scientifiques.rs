//! Tests scientifiques (campagne) : invariants + robustesse + limites contrôlées.
//!
//! But : trouver les limites sans faire chauffer la machine.
//! - budget temps global
//! - tailles bornées (profondeur, longueur)
//! - délais courts quand on cherche le TimeoutError
//!
//! Notes (aligné avec l’état actuel du noyau) :
//! - `-5^2` vaut -25 : la puissance est imbriquée AVANT le repli des moins unaires.
//! - Les fonctions passent par le flottant : on compare à tolérance près, jamais en texte.
//! - `^` décimal reste en décimal : comparé en texte, au chiffre près.

use std::time::{Duration, Instant};

use super::{calculate, calculate_with, Config, Nombre, StatusCode};

fn eval_ok(expr: &str) -> Nombre {
    match calculate(expr) {
        (StatusCode::Success, Some(v)) => v,
        (s, v) => panic!("expr={expr:?} status={s} valeur={v:?}"),
    }
}

fn assert_txt(expr: &str, attendu: &str) {
    assert_eq!(eval_ok(expr).to_string(), attendu, "expr={expr:?}");
}

fn assert_status(expr: &str, attendu: StatusCode) {
    let (s, v) = calculate(expr);
    assert_eq!(s, attendu, "expr={expr:?} valeur={v:?}");
    assert!(v.is_none(), "pas de valeur attendue pour expr={expr:?}");
}

fn assert_proche(expr: &str, attendu: f64) {
    let v = eval_ok(expr).vers_f64();
    assert!(
        (v - attendu).abs() <= 1e-9 * attendu.abs().max(1.0),
        "expr={expr:?} obtenu={v} attendu={attendu}"
    );
}

/// Budget global anti-gel.
fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Précédence et associativité ------------------------ */

#[test]
fn sci_precedence() {
    assert_txt("3+4*2", "11");
    assert_txt("(3+4)*2", "14");
    assert_txt("2^3^2", "512");
    assert_txt("{2^3}^2", "64");
    assert_txt("100/10/5", "2");
    assert_txt("2*3+4*5-6", "20");
}

#[test]
fn sci_unaires() {
    assert_txt("--5", "5");
    assert_txt("-5^2", "-25");
    assert_txt("(-5)^2", "25");
    assert_txt("+-+5", "-5");
    assert_txt("2^-2", "0.25");
    assert_txt("-2^-2", "-0.25");
    assert_txt("3*-(2+1)", "-9");
}

#[test]
fn sci_espaces_ignores_partout() {
    // retirés avant la lecture, y compris dans un nombre ou un mot-clé
    assert_txt("1 2", "12");
    assert_txt("s in(0)", "0");
    assert_txt(" 1 0 0 / 1 0 = ", "10");
    assert_txt("- 5 ^ 2", "-25");
}

/* ------------------------ Exactitude décimale ------------------------ */

#[test]
fn sci_litteraux_exacts() {
    assert_txt("0.1+0.2", "0.3");
    assert_txt("1.5*2", "3.0");
    assert_txt("7/2", "3.5");
    assert_txt("2+3=", "5");
    assert_txt(
        "123456789012345678901234567890*2",
        "246913578024691357802469135780",
    );
}

#[test]
fn sci_division_28_chiffres() {
    assert_txt("1/3", "0.3333333333333333333333333333");
    assert_txt("2/3", "0.6666666666666666666666666667");
    // 29 chiffres significatifs ramenés à 28, arrondi au pair
    assert_txt(
        "1.0000000000000000000000000001*1",
        &format!("1.{}", "0".repeat(27)),
    );
}

#[test]
fn sci_fonctions() {
    assert_proche("sin(1)", 1f64.sin());
    assert_proche("cos{2}+1", 2f64.cos() + 1.0);
    assert_proche("cot(1)", 1.0 / 1f64.tan());
    assert_proche("ln(10)", std::f64::consts::LN_10);
    assert_proche("log(1000)", 3.0);
    // tan(90) : 90 radians, pas une asymptote
    assert_proche("tan(90)", 90f64.tan());
}

#[test]
fn sci_puissance_decimale_28_chiffres() {
    // le reste fractionnaire ne passe jamais par le flottant
    assert_txt("2^0.5", "1.414213562373095048801688724");
    assert_txt("2^2.5", "5.656854249492380195206754897");
    assert_txt("3^-2.5", "0.1924500897298752548363829269");
    assert_txt("4^0.5", "2.000000000000000000000000000");
    assert_txt("2^2.0", "4");

    // bases hors de la plage des f64
    assert_txt("(10^400)^0.5", "1.000000000000000000000000000E+200");
    assert_txt("(10^400)^-0.5", "1E-200");
}

#[test]
fn sci_zero_puissance_zero() {
    assert_txt("0^0", "1");
    assert_status("0.0^0", StatusCode::OverflowError);
    assert_status("0^0.0", StatusCode::OverflowError);
    assert_status("0^0.5", StatusCode::OverflowError);
    assert_txt("0.0^2", "0.00");
}

/* ------------------------ Taxonomie des échecs ------------------------ */

#[test]
fn sci_expressions_invalides() {
    for expr in [
        "3+", "(3+4", "3+4)", "sin 3", "()", "{}", "3(4)", "", "   ", "=", "1.2.3", "2x",
        "*3", "(1)2", "sin", "ln()", "1 . 2 . 3",
    ] {
        assert_status(expr, StatusCode::InvalidExpression);
    }
}

#[test]
fn sci_erreurs_d_evaluation() {
    assert_status("ln(-1)", StatusCode::ValueError);
    assert_status("log(0)", StatusCode::ValueError);
    assert_status("1/0", StatusCode::ZeroDivisionError);
    assert_status("1/(3-3)", StatusCode::ZeroDivisionError);
    assert_status("(-8)^0.5", StatusCode::OverflowError);
}

#[test]
fn sci_depassement_decimal() {
    let config = Config::default().with_exposant_max(50);
    let (s, v) = calculate_with("1.5*10^60", &config);
    assert_eq!(s, StatusCode::OverflowError);
    assert_eq!(v, None);

    // entiers : précision illimitée, pas de dépassement
    let (s, _) = calculate_with("10^60", &config);
    assert_eq!(s, StatusCode::Success);
}

#[test]
fn sci_delai_depasse() {
    let t0 = Instant::now();
    let config = Config::default().with_delai(Duration::from_millis(10));

    let (s, v) = calculate_with("2^999999999", &config);
    assert_eq!(s, StatusCode::TimeoutError);
    assert_eq!(v, None);
    budget(t0, Duration::from_secs(2));
}

#[test]
fn sci_imbrication_profonde() {
    let expr = format!("{}1{}", "(".repeat(2000), ")".repeat(2000));
    assert_status(&expr, StatusCode::MemoryError);

    // juste sous la borne : évaluable
    let config = Config::default().with_profondeur_max(100);
    let expr = format!("{}1{}", "(".repeat(50), ")".repeat(50));
    assert_eq!(
        calculate_with(&expr, &config),
        (StatusCode::Success, Some(Nombre::from(1)))
    );
}

/* ------------------------ Déterminisme et indépendance des appels ------------------------ */

#[test]
fn sci_idempotence() {
    for expr in ["3+4*2", "1/3", "sin(1)", "ln(-1)", "3+", "2^0.5"] {
        assert_eq!(calculate(expr), calculate(expr), "expr={expr:?}");
    }
}

#[test]
fn sci_appels_concurrents_independants() {
    let lent = std::thread::spawn(|| {
        let config = Config::default().with_delai(Duration::from_millis(20));
        calculate_with("2^999999999", &config).0
    });
    let rapides: Vec<_> = (0..4)
        .map(|k| std::thread::spawn(move || calculate(&format!("{k}+1"))))
        .collect();

    for (k, h) in rapides.into_iter().enumerate() {
        let attendu = Nombre::from(k as i64 + 1);
        assert_eq!(
            h.join().unwrap(),
            (StatusCode::Success, Some(attendu))
        );
    }
    assert_eq!(lent.join().unwrap(), StatusCode::TimeoutError);
}

/* ------------------------ Stress contrôlé (sans brûler) ------------------------ */

#[test]
fn sci_stress_somme_longue() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // pas de récursion native : une somme plate de 20 000 termes passe
    let expr = vec!["1"; 20_000].join("+");
    assert_txt(&expr, "20000");
    budget(t0, max);
}

#[test]
fn sci_stress_unaires() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    let expr = format!("{}7", "-".repeat(10_001));
    assert_txt(&expr, "-7");
    budget(t0, max);
}

#[test]
fn sci_stress_bigint() {
    let t0 = Instant::now();
    let max = Duration::from_millis(500);

    // 100 chiffres : reste entier exact
    let big = "9".repeat(100);
    let attendu = format!("1{}", "0".repeat(100));
    assert_txt(&format!("{big}+1"), &attendu);
    assert_txt("2^200", "1606938044258990275541962092341162602522202993782792835301376");
    budget(t0, max);
}
