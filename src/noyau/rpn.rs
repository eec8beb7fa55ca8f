// src/noyau/rpn.rs
//
// Évaluation de l’arbre restructuré : shunting-yard -> RPN -> valeur, groupe par groupe.
//
// Règles:
// - un groupe imbriqué est évalué d’abord ; sa valeur entre dans la file de sortie
// - une fonction s’applique à la valeur de l’élément suivant (son groupe d’argument)
// - un opérateur dépile ceux de précédence >= à la sienne (+ - : 1, * / : 2, ^ : 3)
//   (l’associativité à droite de ^ est déjà portée par l’arbre)
//
// NOTE:
// - Pas de récursion native : un cadre par groupe en cours, sur une pile explicite
//   dont la hauteur est bornée par Config::profondeur_max.

use log::{log_enabled, trace, warn, Level};

use super::arbre::{Arbre, Noeud, NoeudId};
use super::config::Config;
use super::decimal::Contexte;
use super::delai::Garde;
use super::erreur::{ErreurCalcul, Raison};
use super::fonctions::appliquer_fonction;
use super::jetons::{Fonction, Operateur};
use super::nombre::Nombre;

pub fn precedence(op: Operateur) -> u8 {
    match op {
        Operateur::Plus | Operateur::Moins => 1,
        Operateur::Fois | Operateur::Divise => 2,
        Operateur::Puissance => 3,
    }
}

/// Élément de la file de sortie (RPN).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Element {
    Valeur(Nombre),
    Operateur(Operateur),
}

/// Groupe en cours de réduction.
struct Cadre {
    groupe: NoeudId,
    position: usize,
    sortie: Vec<Element>,
    operateurs: Vec<Operateur>,
    // fonction en attente de la valeur de son argument
    fonction: Option<Fonction>,
}

impl Cadre {
    fn new(groupe: NoeudId) -> Self {
        Self {
            groupe,
            position: 0,
            sortie: Vec::new(),
            operateurs: Vec::new(),
            fonction: None,
        }
    }

    fn recevoir(&mut self, valeur: Nombre) -> Result<(), ErreurCalcul> {
        let valeur = match self.fonction.take() {
            Some(f) => appliquer_fonction(f, &valeur)?,
            None => valeur,
        };
        self.sortie.push(Element::Valeur(valeur));
        Ok(())
    }

    fn empiler(&mut self, op: Operateur, garde: &mut Garde) -> Result<(), ErreurCalcul> {
        while let Some(&haut) = self.operateurs.last() {
            if precedence(op) > precedence(haut) {
                break;
            }
            garde.verifier()?;
            self.sortie.push(Element::Operateur(haut));
            self.operateurs.pop();
        }
        self.operateurs.push(op);
        Ok(())
    }

    /// Vide la pile d’opérateurs puis réduit la RPN obtenue.
    fn terminer(mut self, ctx: &Contexte, garde: &mut Garde) -> Result<Nombre, ErreurCalcul> {
        while let Some(op) = self.operateurs.pop() {
            garde.verifier()?;
            self.sortie.push(Element::Operateur(op));
        }
        if log_enabled!(Level::Trace) {
            trace!("rpn: {}", format_rpn(&self.sortie));
        }
        evaluer_postfixe(self.sortie, ctx, garde)
    }
}

/// Évalue le groupe `racine` d’un arbre produit par `imbriquer`.
pub fn evaluer_arbre(
    arbre: &Arbre,
    racine: NoeudId,
    config: &Config,
    garde: &mut Garde,
) -> Result<Nombre, ErreurCalcul> {
    let ctx = Contexte::from(config);
    let mut pile = vec![Cadre::new(racine)];

    loop {
        garde.verifier()?;

        let Some(cadre) = pile.last_mut() else {
            return Err(Raison::Vide.into());
        };

        if let Some(&id) = arbre.enfants(cadre.groupe).get(cadre.position) {
            cadre.position += 1;
            match arbre.noeud(id) {
                Noeud::Groupe(_) => {
                    if pile.len() > config.profondeur_max {
                        warn!("pile d’évaluation > {} cadres", config.profondeur_max);
                        return Err(ErreurCalcul::Memoire);
                    }
                    pile.push(Cadre::new(id));
                }
                Noeud::Nombre(n) => cadre.recevoir(n.clone())?,
                Noeud::Fonction(f) => cadre.fonction = Some(*f),
                Noeud::Operateur(op) => cadre.empiler(*op, garde)?,
            }
            continue;
        }

        // groupe épuisé : sa valeur remonte au cadre parent
        let Some(fini) = pile.pop() else {
            return Err(Raison::Vide.into());
        };
        let valeur = fini.terminer(&ctx, garde)?;
        match pile.last_mut() {
            Some(parent) => parent.recevoir(valeur)?,
            None => return Ok(valeur),
        }
    }
}

/// Réduit une file RPN sur une pile de valeurs.
pub fn evaluer_postfixe(
    rpn: Vec<Element>,
    ctx: &Contexte,
    garde: &mut Garde,
) -> Result<Nombre, ErreurCalcul> {
    let mut st: Vec<Nombre> = Vec::new();

    for e in rpn {
        garde.verifier()?;

        match e {
            Element::Valeur(v) => st.push(v),
            Element::Operateur(op) => {
                let b = st.pop().ok_or(Raison::FinSurOperateur)?;
                let a = st.pop().ok_or(Raison::OperateurInattendu)?;
                st.push(appliquer_operateur(op, &a, &b, ctx, garde)?);
            }
        }
    }

    let resultat = st.pop().ok_or(Raison::Vide)?;
    if !st.is_empty() {
        return Err(Raison::OperateurAttendu.into());
    }
    Ok(resultat)
}

pub fn appliquer_operateur(
    op: Operateur,
    a: &Nombre,
    b: &Nombre,
    ctx: &Contexte,
    garde: &mut Garde,
) -> Result<Nombre, ErreurCalcul> {
    match op {
        Operateur::Plus => a.additionner(b, ctx),
        Operateur::Moins => a.soustraire(b, ctx),
        Operateur::Fois => a.multiplier(b, ctx),
        Operateur::Divise => {
            if b.is_zero() {
                return Err(ErreurCalcul::DivisionParZero);
            }
            a.diviser(b, ctx)
        }
        Operateur::Puissance => a.puissance(b, ctx, garde),
    }
}

/// Format utilitaire (debug) : file RPN en texte.
pub fn format_rpn(rpn: &[Element]) -> String {
    rpn.iter()
        .map(|e| match e {
            Element::Valeur(v) => v.to_string(),
            Element::Operateur(op) => op.symbole().to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
