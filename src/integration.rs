//! Measure/notify/commit loop shared by the terminal preview and headless output.
//!
//! A round re-subscribes the current items, reports every box size as one
//! observer batch, and lets the coordinator flush. A commit restyles the tree,
//! which can change item boxes and so trigger another round. The loop stops
//! once a round produces no size change or the pass is deferred.

use crate::config::ResolvedConfig;
use crate::layout::{DeferReason, FlushOutcome, Masonry, MasonryFrame, ObservedSet, VisualTree};
use crate::scene::Scene;
use crate::view::TerminalTree;
use tracing::{debug, warn};

/// Upper bound on restyle rounds; a settled layout needs three.
pub const MAX_ROUNDS: usize = 8;

/// Outcome of driving a tree to rest.
#[derive(Debug, Clone, PartialEq)]
pub struct Settled {
    /// Frame after the last round.
    pub frame: MasonryFrame,
    /// Rounds run, including the final one that found nothing to do.
    pub rounds: usize,
    /// Why the last pass kept the previous layout, if it did.
    pub deferred: Option<DeferReason>,
}

/// Build the coordinator for `scene` under `config`, with scene props on top.
pub fn masonry_for(scene: &Scene, config: &ResolvedConfig) -> Masonry<ObservedSet> {
    let props = scene.props.apply(config.props.clone());
    Masonry::new(props, config.breakpoints, config.spacing, Some(ObservedSet::new()))
}

/// Run rounds until the layout stops changing. `paint` sees every committed frame.
pub fn drive<E>(
    masonry: &mut Masonry<ObservedSet>,
    tree: &mut TerminalTree,
    mut paint: impl FnMut(&TerminalTree, &MasonryFrame) -> Result<(), E>,
) -> Result<Settled, E> {
    tree.apply(&masonry.frame());

    let mut rounds = 0;
    let mut deferred = None;
    let mut at_rest = false;
    while rounds < MAX_ROUNDS {
        rounds += 1;
        masonry.sync_items(&tree.items());

        let view: &TerminalTree = tree;
        let outcome =
            masonry.on_size_changes(view.measurements(), view, |frame| paint(view, frame))?;

        match outcome {
            FlushOutcome::Committed => {
                deferred = None;
                tree.apply(&masonry.frame());
            }
            FlushOutcome::Deferred(reason) => {
                debug!(%reason, rounds, "layout pass deferred");
                deferred = Some(reason);
                at_rest = true;
                break;
            }
            FlushOutcome::Ignored => {
                at_rest = true;
                break;
            }
        }
    }

    if !at_rest {
        warn!(rounds, "layout did not settle");
    }

    Ok(Settled {
        frame: masonry.frame(),
        rounds,
        deferred,
    })
}

/// Lay `scene` out at `width_px` without a terminal.
pub fn settle(scene: Scene, config: &ResolvedConfig, width_px: f64) -> Settled {
    let mut masonry = masonry_for(&scene, config);
    let mut tree = TerminalTree::new(scene, width_px, config.breakpoints);
    match drive(&mut masonry, &mut tree, |_, _| Ok::<(), std::convert::Infallible>(())) {
        Ok(settled) => settled,
        Err(never) => match never {},
    }
}
