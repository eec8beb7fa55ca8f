// src/noyau/imbrication.rs
//
// Restructuration d’une suite de jetons VALIDÉE en arbre de groupes, en 4 étapes :
//   1) parenthèses  -> groupes (les parenthèses disparaissent)
//   2) fonctions    -> [f, argument]
//   3) puissances   -> [base, ^, signes…, exposant] (associativité à droite)
//   4) moins unaires -> [-1 * opérande] (les + unaires disparaissent)
//
// Chaque étape ne réécrit que les groupes qui existaient avant elle.
// Après l’étape 4, chaque groupe est une alternance stricte opérande / opérateur
// (ou [f, argument]).

use log::{debug, warn};

use super::arbre::{Arbre, Noeud, NoeudId};
use super::config::Config;
use super::delai::Garde;
use super::erreur::{ErreurCalcul, Raison};
use super::jetons::{Jeton, Operateur};
use super::nombre::Nombre;

/// Enchaîne les 4 étapes ; renvoie l’arène et le groupe racine.
pub fn imbriquer(
    tokens: &[Jeton],
    config: &Config,
    garde: &mut Garde,
) -> Result<(Arbre, NoeudId), ErreurCalcul> {
    let (mut arbre, racine) = imbriquer_parentheses(tokens, config, garde)?;
    imbriquer_fonctions(&mut arbre, garde)?;
    imbriquer_puissances(&mut arbre, garde)?;
    replier_unaires(&mut arbre, garde)?;

    debug!("arbre: {} ({} nœuds)", arbre.afficher(racine), arbre.len());
    Ok((arbre, racine))
}

/// Étape 1 : une pile de groupes ouverts ; la profondeur est bornée.
pub fn imbriquer_parentheses(
    tokens: &[Jeton],
    config: &Config,
    garde: &mut Garde,
) -> Result<(Arbre, NoeudId), ErreurCalcul> {
    let mut arbre = Arbre::new();
    let mut ouverts: Vec<Vec<NoeudId>> = vec![Vec::new()];

    for t in tokens {
        garde.verifier()?;

        let noeud = match t {
            Jeton::Parenthese(p) if p.est_ouvrante() => {
                if ouverts.len() > config.profondeur_max {
                    warn!("imbrication > {} niveaux", config.profondeur_max);
                    return Err(ErreurCalcul::Memoire);
                }
                ouverts.push(Vec::new());
                continue;
            }
            Jeton::Parenthese(_) => {
                let enfants = match ouverts.pop() {
                    Some(e) if !ouverts.is_empty() => e,
                    _ => return Err(Raison::OuverteAGauche.into()),
                };
                Noeud::Groupe(enfants)
            }
            Jeton::Nombre(n) => Noeud::Nombre(n.clone()),
            Jeton::Operateur(op) => Noeud::Operateur(*op),
            Jeton::Fonction(f) => Noeud::Fonction(*f),
        };

        let id = arbre.ajouter(noeud);
        if let Some(courant) = ouverts.last_mut() {
            courant.push(id);
        }
    }

    let racine = match ouverts.pop() {
        Some(enfants) if ouverts.is_empty() => enfants,
        _ => return Err(Raison::OuverteADroite.into()),
    };
    let racine = arbre.ajouter(Noeud::Groupe(racine));
    Ok((arbre, racine))
}

/// Étape 2 : `f` et le groupe qui la suit fusionnent en `[f, argument]`.
pub fn imbriquer_fonctions(arbre: &mut Arbre, garde: &mut Garde) -> Result<(), ErreurCalcul> {
    for g in arbre.groupes() {
        let enfants = arbre.enfants(g).to_vec();
        if !enfants
            .iter()
            .any(|id| matches!(arbre.noeud(*id), Noeud::Fonction(_)))
        {
            continue;
        }

        let mut nouveaux = Vec::with_capacity(enfants.len());
        let mut iter = enfants.into_iter();
        while let Some(id) = iter.next() {
            garde.verifier()?;

            let &Noeud::Fonction(f) = arbre.noeud(id) else {
                nouveaux.push(id);
                continue;
            };
            let argument = iter.next().ok_or(Raison::ParentheseAttendue(f))?;
            nouveaux.push(arbre.ajouter(Noeud::Groupe(vec![id, argument])));
        }
        arbre.remplacer_enfants(g, nouveaux);
    }
    Ok(())
}

/// Étape 3 : parcours à rebours.
///
/// Sur `^`, la base est l’élément immédiatement à gauche ; l’exposant est repris
/// dans la sortie (déjà construite, à rebours) avec les `+`/`-` unaires qui le
/// précèdent, de sorte que les signes restent attachés à l’exposant.
/// `2^3^2` => `[2 ^ [3 ^ 2]]`, `2^-2` => `[2 ^ - 2]`, `-5^2` => `- [5 ^ 2]`.
pub fn imbriquer_puissances(arbre: &mut Arbre, garde: &mut Garde) -> Result<(), ErreurCalcul> {
    for g in arbre.groupes() {
        let enfants = arbre.enfants(g).to_vec();
        if !enfants
            .iter()
            .any(|id| arbre.noeud(*id).operateur() == Some(Operateur::Puissance))
        {
            continue;
        }

        let mut sortie: Vec<NoeudId> = Vec::with_capacity(enfants.len());
        let mut iter = enfants.into_iter().rev();

        while let Some(id) = iter.next() {
            garde.verifier()?;

            if arbre.noeud(id).operateur() != Some(Operateur::Puissance) {
                sortie.push(id);
                continue;
            }

            let base = iter.next().ok_or(Raison::OperateurInattendu)?;
            let mut groupe = vec![base, id];
            loop {
                garde.verifier()?;
                let suivant = sortie.pop().ok_or(Raison::FinSurOperateur)?;
                groupe.push(suivant);
                if !arbre.noeud(suivant).operateur().is_some_and(|op| op.est_unaire()) {
                    break;
                }
            }
            sortie.push(arbre.ajouter(Noeud::Groupe(groupe)));
        }

        sortie.reverse();
        arbre.remplacer_enfants(g, sortie);
    }
    Ok(())
}

/// Étape 4 : après un opérande, l’opérateur suivant est binaire ; ailleurs `-` compte,
/// `+` s’efface, et un nombre impair de `-` donne `[-1 * opérande]`.
pub fn replier_unaires(arbre: &mut Arbre, garde: &mut Garde) -> Result<(), ErreurCalcul> {
    for g in arbre.groupes() {
        let enfants = arbre.enfants(g).to_vec();
        let mut nouveaux = Vec::with_capacity(enfants.len());
        let mut apres_operande = false;
        let mut moins: usize = 0;
        let mut modifie = false;

        for id in enfants {
            garde.verifier()?;

            match arbre.noeud(id) {
                Noeud::Operateur(_) if apres_operande => {
                    nouveaux.push(id);
                    apres_operande = false;
                }
                Noeud::Operateur(op) => {
                    if *op == Operateur::Moins {
                        moins += 1;
                    }
                    modifie = true;
                }
                // tête d’un groupe [f, argument]
                Noeud::Fonction(_) => nouveaux.push(id),
                Noeud::Nombre(_) | Noeud::Groupe(_) => {
                    if moins % 2 == 1 {
                        let moins_un = arbre.ajouter(Noeud::Nombre(Nombre::from(-1)));
                        let fois = arbre.ajouter(Noeud::Operateur(Operateur::Fois));
                        nouveaux.push(arbre.ajouter(Noeud::Groupe(vec![moins_un, fois, id])));
                    } else {
                        nouveaux.push(id);
                    }
                    moins = 0;
                    apres_operande = true;
                }
            }
        }

        if modifie {
            arbre.remplacer_enfants(g, nouveaux);
        }
    }
    Ok(())
}
