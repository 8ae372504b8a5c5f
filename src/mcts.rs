use crate::board::{Board, Cell, Move, Placement, Stone};
use crate::mcts_node::MctsNode;
use crate::random::RandomGenerator;
use ego_tree::{NodeId, NodeRef, Tree};
use log::trace;
use std::time::Instant;

/// Default exploration constant `c` of the UCB formula.
pub const DEFAULT_EXPLORATION: f64 = 0.1;
/// Default per-depth factor `psi` applied to the exploitation term. `-1` alternates its sign.
pub const DEFAULT_DECAY: f64 = -1.0;

/// The main struct for running the Monte Carlo Tree Search algorithm.
///
/// It holds the search tree, the random number generator, and the configuration for the search.
/// Every node counts the simulations won by its own mover, so siblings (which share a mover)
/// have directly comparable win rates.
pub struct MonteCarloTreeSearch<T: Board, K: RandomGenerator> {
    tree: Tree<MctsNode<T>>,
    root_id: NodeId,
    random: K,
    exploration: f64,
    decay: f64,
    node_count: usize,
    next_step: MctsStep,
}

impl<T: Board, K: RandomGenerator> Default for MonteCarloTreeSearch<T, K> {
    fn default() -> Self {
        MonteCarloTreeSearchBuilder::new(T::default()).build()
    }
}

/// A builder for creating instances of `MonteCarloTreeSearch`.
pub struct MonteCarloTreeSearchBuilder<T: Board, K: RandomGenerator> {
    board: T,
    random_generator: K,
    exploration: f64,
    decay: f64,
}

impl<T: Board, K: RandomGenerator> MonteCarloTreeSearchBuilder<T, K> {
    /// Creates a new builder with the given initial board state.
    pub fn new(board: T) -> Self {
        Self {
            board,
            random_generator: K::default(),
            exploration: DEFAULT_EXPLORATION,
            decay: DEFAULT_DECAY,
        }
    }

    /// Sets the random number generator for the MCTS search.
    pub fn with_random_generator(mut self, rg: K) -> Self {
        self.random_generator = rg;
        self
    }

    /// Sets the exploration constant `c`.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Sets the factor `psi` that scales the exploitation term once per level of descent.
    pub fn with_decay(mut self, psi: f64) -> Self {
        self.decay = psi;
        self
    }

    /// Builds the `MonteCarloTreeSearch` instance with the configured parameters.
    pub fn build(self) -> MonteCarloTreeSearch<T, K> {
        MonteCarloTreeSearch::new(
            self.board,
            self.random_generator,
            self.exploration,
            self.decay,
        )
    }
}

impl<T: Board, K: RandomGenerator> MonteCarloTreeSearch<T, K> {
    /// Returns a new builder for `MonteCarloTreeSearch`.
    pub fn builder(board: T) -> MonteCarloTreeSearchBuilder<T, K> {
        MonteCarloTreeSearchBuilder::new(board)
    }

    /// Creates a new `MonteCarloTreeSearch` instance.
    ///
    /// The root frontier is shuffled with `rg`, which is then kept for the rest of the search.
    pub fn new(board: T, mut rg: K, exploration: f64, decay: f64) -> Self {
        let root = MctsNode::new_root(board, &mut rg);
        let tree = Tree::new(root);
        let root_id = tree.root().id();

        Self {
            tree,
            root_id,
            random: rg,
            exploration,
            decay,
            node_count: 1,
            next_step: MctsStep::Selection { updated: vec![] },
        }
    }

    /// Returns an immutable reference to the underlying search tree.
    pub fn get_tree(&self) -> &Tree<MctsNode<T>> {
        &self.tree
    }

    /// Returns the root node of the search tree.
    pub fn get_root(&self) -> NodeRef<'_, MctsNode<T>> {
        self.tree.root()
    }

    /// Returns the number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.node_count
    }

    /// Returns the next MCTS step to be performed. Useful for debugging and visualization.
    pub fn get_next_mcts_step(&self) -> &MctsStep {
        &self.next_step
    }

    /// Executes a single step of the MCTS algorithm (Selection, Expansion, Simulation, or Backpropagation).
    pub fn execute_step(&mut self) {
        let step = std::mem::replace(&mut self.next_step, MctsStep::Selection { updated: vec![] });
        self.next_step = match step {
            MctsStep::Selection { updated: _ } => MctsStep::Expansion {
                path: self.select(),
            },
            MctsStep::Expansion { mut path } => {
                let leaf_id = *path.last().expect("BUG: empty selection path");
                let fixed_winner = self.node(leaf_id).value().winner();
                match fixed_winner {
                    Some(winner) => MctsStep::Backpropagation { path, winner },
                    None => {
                        path.push(self.expand_node(leaf_id));
                        MctsStep::Simulation { path }
                    }
                }
            }
            MctsStep::Simulation { path } => {
                let leaf_id = *path.last().expect("BUG: empty simulation path");
                let winner = self.simulate(leaf_id);
                MctsStep::Backpropagation { path, winner }
            }
            MctsStep::Backpropagation { path, winner } => {
                self.backpropagate(&path, winner);
                trace!("cycle finished at depth {}, {} wins", path.len() - 1, winner);
                MctsStep::Selection { updated: path }
            }
        };
    }

    /// Performs one full iteration of the MCTS algorithm (Selection, Expansion, Simulation, Backpropagation).
    /// Returns the path of nodes that were updated during backpropagation.
    pub fn do_iteration(&mut self) -> Vec<NodeId> {
        loop {
            self.execute_step();
            if let MctsStep::Selection { updated } = &self.next_step {
                return updated.clone();
            }
        }
    }

    /// Runs the MCTS search for a specified number of iterations.
    pub fn iterate_n_times(&mut self, n: u32) {
        for _ in 0..n {
            self.do_iteration();
        }
    }

    /// Runs batches of `batch` iterations until `deadline` has passed and returns the number of
    /// iterations performed.
    ///
    /// The clock is only read between batches, so at least one batch always runs and the
    /// deadline may be overrun by the duration of one batch.
    pub fn iterate_until(&mut self, deadline: Instant, batch: u32) -> u64 {
        let batch = batch.max(1);
        let mut iterations = 0;
        loop {
            self.iterate_n_times(batch);
            iterations += u64::from(batch);
            if Instant::now() >= deadline {
                return iterations;
            }
        }
    }

    /// True iff every legal move of the node has been expanded into a child.
    ///
    /// Terminal nodes have no legal move and are always fully expanded.
    pub fn is_fully_expanded(&self, node_id: NodeId) -> bool {
        let node = self.node(node_id);
        let data = node.value();
        data.is_terminal() || (data.frontier().is_empty() && node.has_children())
    }

    /// Returns the move of the most visited child of the root, the first one in child order on
    /// ties, or `None` if the root has no children.
    pub fn best_child_by_visits(&self) -> Option<Move> {
        let mut best: Option<&MctsNode<T>> = None;
        for child in self.get_root().children() {
            let data = child.value();
            if best.is_none_or(|b| data.visits > b.visits) {
                best = Some(data);
            }
        }
        best.and_then(|b| b.prev_move)
    }

    /// Returns the statistics of every child of the root, in child order.
    pub fn root_stats(&self) -> Vec<MoveStats> {
        self.get_root()
            .children()
            .filter_map(|child| {
                let data = child.value();
                data.prev_move.map(|mv| MoveStats {
                    mv,
                    wins: u64::from(data.wins),
                    visits: u64::from(data.visits),
                })
            })
            .collect()
    }

    fn node(&self, node_id: NodeId) -> NodeRef<'_, MctsNode<T>> {
        self.tree
            .get(node_id)
            .expect("BUG: node id does not belong to this tree")
    }

    /// Descends from the root while the current node is fully expanded and not terminal.
    /// Returns the visited path, root first.
    fn select(&self) -> Vec<NodeId> {
        let mut path = vec![self.root_id];
        let mut current = self.root_id;
        let mut weight = 1.0;
        while self.is_fully_expanded(current) && !self.node(current).value().is_terminal() {
            current = self.select_child(current, weight);
            path.push(current);
            weight *= self.decay;
        }
        path
    }

    /// Picks the child with the highest score; the first one wins ties.
    fn select_child(&self, parent_id: NodeId, weight: f64) -> NodeId {
        let parent = self.node(parent_id);
        let log_visits = f64::ln(parent.value().visits as f64);
        let mut best_child_id: Option<NodeId> = None;
        let mut max_ucb = f64::MIN;
        for child in parent.children() {
            let data = child.value();
            let current_ucb =
                Self::ucb_value(log_visits, data.wins, data.visits, weight, self.exploration);
            if best_child_id.is_none() || current_ucb > max_ucb {
                max_ucb = current_ucb;
                best_child_id = Some(child.id());
            }
        }
        best_child_id.expect("BUG: selecting among the children of a childless node")
    }

    /// Calculates `weight * Q + c * sqrt(ln(N) / n)` for a child with `n` visits under a parent
    /// with `N` visits.
    fn ucb_value(log_parent_visits: f64, wins: u32, visits: u32, weight: f64, c: f64) -> f64 {
        debug_assert!(visits > 0, "selection reached an unvisited child");
        let visits = visits as f64;
        let exploit = (wins as f64) / visits;
        let explore = f64::sqrt(log_parent_visits / visits);
        weight * exploit + c * explore
    }

    /// Expands the next frontier move of a node into a new child and returns the child's id.
    fn expand_node(&mut self, node_id: NodeId) -> NodeId {
        let mut node = self
            .tree
            .get_mut(node_id)
            .expect("BUG: node id does not belong to this tree");
        let data = node.value();
        let Some(cell) = data.pop_frontier() else {
            panic!("BUG: expanding already expanded node");
        };

        let mut board = data.board.clone();
        let mover = board.mover();
        let placement = board.place(cell);
        assert_eq!(
            placement,
            Placement::Legal,
            "BUG: frontier cell {} is illegal",
            cell
        );

        let child = MctsNode::new_child(
            board,
            data.empty_cells(),
            Move::new(cell, mover),
            data.height + 1,
            &mut self.random,
        );
        let child_id = node.append(child).id();
        self.node_count += 1;
        child_id
    }

    /// Plays a random game from a node until the player to move is stuck, and returns the winner.
    fn simulate(&mut self, node_id: NodeId) -> Stone {
        let mut node = self
            .tree
            .get_mut(node_id)
            .expect("BUG: node id does not belong to this tree");
        let data = node.value();
        let board = data.board.clone();
        rollout(board, data.empty_cells_mut(), &mut self.random).winner
    }

    /// Propagates the result of a simulation back up the tree. Each node on the path counts a
    /// win iff `winner` is the player to move at that node.
    fn backpropagate(&mut self, path: &[NodeId], winner: Stone) {
        for node_id in path.iter().rev() {
            let mut node = self
                .tree
                .get_mut(*node_id)
                .expect("BUG: node id does not belong to this tree");
            let data = node.value();
            let won = winner == data.mover();
            data.update(won);
        }
    }
}

/// Outcome of a random playout.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct Rollout {
    /// The player who was not to move when the playout got stuck.
    pub winner: Stone,
    /// Number of stones placed during the playout.
    pub moves: usize,
}

/// Plays uniformly random legal moves on `board` until the player to move has none.
///
/// `candidates` must hold the empty cells of `board`. They are shuffled once; each round takes
/// the last candidate of the working range, plays it if legal (shrinking the range), otherwise
/// rotates it to the front so it is retried only after the rest of the range. A full round
/// without a legal candidate ends the playout, so at most one stone is placed per candidate.
pub fn rollout<T: Board, K: RandomGenerator>(
    mut board: T,
    candidates: &mut [Cell],
    random: &mut K,
) -> Rollout {
    random.shuffle(candidates);
    let mut remaining = candidates.len();
    let mut scanned = 0;
    let mut moves = 0;
    while remaining > 0 {
        let cell = candidates[remaining - 1];
        if board.place(cell) == Placement::Legal {
            remaining -= 1;
            scanned = 0;
            moves += 1;
        } else if scanned < remaining {
            candidates.swap(scanned, remaining - 1);
            scanned += 1;
        } else {
            break;
        }
    }

    assert!(
        moves <= candidates.len(),
        "BUG: rollout placed {} stones on {} empty cells",
        moves,
        candidates.len()
    );
    debug_assert!(candidates.iter().all(|&cell| !board.is_legal(cell)));

    Rollout {
        winner: board.mover().opponent(),
        moves,
    }
}

/// Accumulated statistics of one root move.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub struct MoveStats {
    pub mv: Move,
    /// Simulations through this move won by the player to move after it.
    pub wins: u64,
    pub visits: u64,
}

/// Represents the four main stages of the MCTS algorithm.
///
/// This enum is used to manage the state of the search process.
#[derive(Debug, PartialEq, Clone)]
pub enum MctsStep {
    /// **Selection**: Start from the root and descend through fully expanded nodes.
    Selection {
        /// The path of nodes updated during the last backpropagation phase.
        updated: Vec<NodeId>,
    },
    /// **Expansion**: Create one child of the last node of `path`, unless it is terminal.
    Expansion {
        /// The selected path, root first.
        path: Vec<NodeId>,
    },
    /// **Simulation**: Run a random playout from the last node of `path`.
    Simulation {
        /// The selected path extended with the new child.
        path: Vec<NodeId>,
    },
    /// **Backpropagation**: Update the statistics of every node on `path`.
    Backpropagation {
        path: Vec<NodeId>,
        /// The result of the simulation, or the fixed outcome of a terminal node.
        winner: Stone,
    },
}

impl MctsStep {
    /// Returns the name of the current MCTS step as a string.
    pub fn get_name(&self) -> String {
        match self {
            MctsStep::Selection { .. } => "Selection".to_string(),
            MctsStep::Expansion { .. } => "Expansion".to_string(),
            MctsStep::Simulation { .. } => "Simulation".to_string(),
            MctsStep::Backpropagation { .. } => "Backpropagation".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::CELL_COUNT;
    use crate::boards::nogo::NoGoBoard;
    use crate::boards::nogo::tests::{one_move_left, three_moves_left};
    use crate::random::CustomNumberGenerator;

    type NoGoSearch = MonteCarloTreeSearch<NoGoBoard, CustomNumberGenerator>;

    fn search(board: NoGoBoard, seed: u64) -> NoGoSearch {
        MonteCarloTreeSearch::builder(board)
            .with_random_generator(CustomNumberGenerator::from_seed(seed))
            .build()
    }

    /// Four cells, any empty one is legal until three stones are down. Black always wins.
    #[derive(Debug, Default, Clone)]
    struct ThreeStones {
        stones: Vec<Cell>,
    }

    impl Board for ThreeStones {
        fn place(&mut self, cell: Cell) -> Placement {
            if cell >= 4 || self.stones.len() >= 3 || self.stones.contains(&cell) {
                return Placement::Illegal;
            }
            self.stones.push(cell);
            Placement::Legal
        }

        fn empty_cells(&self) -> Vec<Cell> {
            (0..4).filter(|cell| !self.stones.contains(cell)).collect()
        }

        fn mover(&self) -> Stone {
            if self.stones.len() % 2 == 0 {
                Stone::Black
            } else {
                Stone::White
            }
        }
    }

    type ThreeStonesSearch = MonteCarloTreeSearch<ThreeStones, CustomNumberGenerator>;

    fn set_stats(mcts: &mut ThreeStonesSearch, node_id: NodeId, wins: u32, visits: u32) {
        let mut node = mcts.tree.get_mut(node_id).unwrap();
        let data = node.value();
        data.wins = wins;
        data.visits = visits;
    }

    fn children(mcts: &ThreeStonesSearch, node_id: NodeId) -> Vec<NodeId> {
        mcts.node(node_id).children().map(|child| child.id()).collect()
    }

    /// Builds root -> 4 children, the first child fully expanded, and its first two children
    /// fully expanded, with statistics chosen so the exploitation sign decides every level below
    /// the root.
    fn shaped_tree(decay: f64) -> (ThreeStonesSearch, Vec<NodeId>, Vec<NodeId>) {
        let mut mcts = MonteCarloTreeSearch::builder(ThreeStones::default())
            .with_random_generator(CustomNumberGenerator::from_seed(6))
            .with_exploration(0.1)
            .with_decay(decay)
            .build();
        let root_id = mcts.root_id;
        for _ in 0..4 {
            mcts.expand_node(root_id);
        }
        let level1 = children(&mcts, root_id);
        for _ in 0..3 {
            mcts.expand_node(level1[0]);
        }
        let level2 = children(&mcts, level1[0]);
        for &node_id in &level2[..2] {
            for _ in 0..2 {
                mcts.expand_node(node_id);
            }
        }

        set_stats(&mut mcts, root_id, 0, 100);
        set_stats(&mut mcts, level1[0], 40, 40);
        for &node_id in &level1[1..] {
            set_stats(&mut mcts, node_id, 0, 20);
        }
        set_stats(&mut mcts, level2[0], 10, 10);
        set_stats(&mut mcts, level2[1], 0, 20);
        set_stats(&mut mcts, level2[2], 5, 10);
        for &node_id in &level2[..2] {
            let leaves = children(&mcts, node_id);
            set_stats(&mut mcts, leaves[0], 0, 5);
            set_stats(&mut mcts, leaves[1], 5, 5);
        }
        (mcts, level1, level2)
    }

    #[test]
    fn k_legal_moves_need_k_expansions() {
        // arrange
        let mut mcts = search(three_moves_left(), 1);
        assert!(!mcts.is_fully_expanded(mcts.root_id));

        // act
        mcts.iterate_n_times(2);
        let partially_expanded = mcts.is_fully_expanded(mcts.root_id);
        mcts.iterate_n_times(1);

        // assert
        assert!(!partially_expanded);
        assert_eq!(mcts.get_root().children().count(), 3);
        assert!(mcts.is_fully_expanded(mcts.root_id));
        let mut cells: Vec<Cell> = mcts.root_stats().iter().map(|s| s.mv.cell).collect();
        cells.sort_unstable();
        assert_eq!(cells, vec![40, 60, 80]);
    }

    #[test]
    fn one_cycle_visits_exactly_the_path() {
        // arrange
        let mut mcts = search(NoGoBoard::default(), 5);
        mcts.iterate_n_times(150);
        let before: Vec<(NodeId, u32)> = mcts
            .get_root()
            .descendants()
            .map(|n| (n.id(), n.value().visits))
            .collect();

        // act
        let path = mcts.do_iteration();

        // assert
        assert!(path.len() > 2);
        assert_eq!(path[0], mcts.root_id);
        for (node_id, visits) in before {
            let expected = if path.contains(&node_id) { visits + 1 } else { visits };
            assert_eq!(mcts.node(node_id).value().visits, expected);
        }
        let new_leaf = mcts.node(*path.last().unwrap());
        assert_eq!(new_leaf.value().visits, 1);
        assert_eq!(mcts.node_count(), 152);
    }

    #[test]
    fn root_without_moves_is_terminal() {
        // arrange
        let mut board = one_move_left();
        board.place(80);
        let mut mcts = search(board, 3);

        // assert
        assert!(mcts.get_root().value().is_terminal());
        assert!(mcts.is_fully_expanded(mcts.root_id));
        assert_eq!(mcts.best_child_by_visits(), None);

        // act
        mcts.iterate_n_times(5);

        // assert
        let root = mcts.get_root().value();
        assert_eq!(root.visits, 5);
        assert_eq!(root.wins, 0);
        assert_eq!(mcts.node_count(), 1);
        assert_eq!(mcts.best_child_by_visits(), None);
    }

    #[test]
    fn single_legal_move_is_found_for_any_seed() {
        for seed in 0..10 {
            // arrange
            let mut mcts = search(one_move_left(), seed);

            // act
            mcts.iterate_n_times(1 + seed as u32);

            // assert
            assert_eq!(
                mcts.best_child_by_visits(),
                Some(Move::new(80, Stone::Black))
            );
            let root = mcts.get_root().value();
            assert_eq!(root.wins, root.visits);
            let child = mcts.get_root().first_child().unwrap();
            assert!(child.value().is_terminal());
            assert_eq!(child.value().winner(), Some(Stone::Black));
            assert_eq!(child.value().mover(), Stone::White);
            assert_eq!(child.value().wins, 0);
        }
    }

    #[test]
    fn single_iteration_on_empty_board_creates_one_child() {
        // arrange
        let mut mcts = search(NoGoBoard::default(), 9);

        // act
        mcts.iterate_n_times(1);

        // assert
        assert_eq!(mcts.get_root().children().count(), 1);
        let child = mcts.get_root().first_child().unwrap();
        assert_eq!(child.value().visits, 1);
        assert_eq!(child.value().height, 1);
        let mv = mcts.best_child_by_visits().unwrap();
        assert_eq!(Some(mv), child.value().prev_move);
        assert_eq!(mv.stone, Stone::Black);
        assert_eq!(child.value().frontier().len(), CELL_COUNT - 1);
    }

    #[test]
    fn every_node_has_been_simulated() {
        // arrange
        let mut mcts = search(NoGoBoard::default(), 21);

        // act
        mcts.iterate_n_times(500);

        // assert
        let root = mcts.get_root().value();
        assert_eq!(root.visits, 500);
        assert!(root.wins <= root.visits);
        assert_eq!(mcts.node_count(), 501);
        for node in mcts.get_root().descendants() {
            assert!(node.value().visits >= 1);
            let children: u32 = node.children().map(|c| c.value().visits).sum();
            assert!(children <= node.value().visits);
        }
        assert!(mcts.is_fully_expanded(mcts.root_id));
    }

    #[test]
    fn steps_follow_the_cycle() {
        // arrange
        let mut mcts = search(NoGoBoard::default(), 2);
        let mut names = vec![mcts.get_next_mcts_step().get_name()];

        // act
        for _ in 0..4 {
            mcts.execute_step();
            names.push(mcts.get_next_mcts_step().get_name());
        }

        // assert
        assert_eq!(
            names,
            vec![
                "Selection",
                "Expansion",
                "Simulation",
                "Backpropagation",
                "Selection"
            ]
        );
        assert_eq!(mcts.get_root().value().visits, 1);
    }

    #[test]
    fn terminal_leaf_skips_simulation() {
        // arrange
        let mut mcts = search(one_move_left(), 4);
        mcts.iterate_n_times(1);

        // act
        mcts.execute_step();
        let after_selection = mcts.get_next_mcts_step().clone();
        mcts.execute_step();

        // assert
        let MctsStep::Expansion { path } = after_selection else {
            panic!("expected expansion");
        };
        assert_eq!(path.len(), 2);
        assert_eq!(
            mcts.get_next_mcts_step(),
            &MctsStep::Backpropagation {
                path,
                winner: Stone::Black
            }
        );
    }

    #[test]
    fn same_seed_builds_same_tree() {
        let mut a = search(NoGoBoard::default(), 77);
        let mut b = search(NoGoBoard::default(), 77);
        a.iterate_n_times(300);
        b.iterate_n_times(300);
        assert_eq!(a.root_stats(), b.root_stats());
        assert_eq!(a.best_child_by_visits(), b.best_child_by_visits());
    }

    #[test]
    fn each_node_credits_its_own_mover() {
        // arrange
        let mut mcts = MonteCarloTreeSearch::builder(ThreeStones::default())
            .with_random_generator(CustomNumberGenerator::from_seed(17))
            .build();

        // act
        let path = mcts.do_iteration();
        mcts.iterate_n_times(40);

        // assert
        assert_eq!(path.len(), 2);
        assert_eq!(mcts.node(path[0]).value().wins, 1);
        assert_eq!(mcts.node(path[1]).value().mover(), Stone::White);
        for node in mcts.get_root().descendants() {
            let data = node.value();
            assert!(data.visits > 0);
            let expected = match data.mover() {
                Stone::Black => data.visits,
                Stone::White => 0,
            };
            assert_eq!(data.wins, expected, "node at height {}", data.height);
        }
        assert!(mcts.get_root().descendants().any(|n| n.value().height == 3));
    }

    #[test]
    fn decay_applies_once_per_level_below_the_root() {
        // arrange
        let (plain, level1, level2) = shaped_tree(1.0);
        let (flipped, flipped_level1, flipped_level2) = shaped_tree(-1.0);

        // act
        let plain_path = plain.select();
        let flipped_path = flipped.select();

        // assert
        let plain_leaves = children(&plain, level2[0]);
        assert_eq!(
            plain_path,
            vec![plain.root_id, level1[0], level2[0], plain_leaves[1]]
        );
        let flipped_leaves = children(&flipped, flipped_level2[1]);
        assert_eq!(
            flipped_path,
            vec![
                flipped.root_id,
                flipped_level1[0],
                flipped_level2[1],
                flipped_leaves[1]
            ]
        );
        assert!(flipped.node(flipped_leaves[1]).value().is_terminal());
    }

    #[test]
    fn ucb_weight_scales_exploitation_only() {
        let log_visits = f64::ln(100.0);
        let plain = NoGoSearch::ucb_value(log_visits, 30, 40, 1.0, 0.5);
        let flipped = NoGoSearch::ucb_value(log_visits, 30, 40, -1.0, 0.5);
        let explore = 0.5 * f64::sqrt(log_visits / 40.0);
        assert!((plain - (0.75 + explore)).abs() < 1e-12);
        assert!((flipped - (-0.75 + explore)).abs() < 1e-12);
    }

    #[test]
    fn rollout_places_at_most_one_stone_per_cell() {
        let mut random = CustomNumberGenerator::from_seed(13);
        for _ in 0..20 {
            let board = NoGoBoard::default();
            let mut cells = board.empty_cells();
            let result = rollout(board, &mut cells, &mut random);
            assert!(result.moves > 0);
            assert!(result.moves <= CELL_COUNT);
            let mut sorted = cells.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, board.empty_cells());
        }
    }

    #[test]
    fn rollout_from_forced_position() {
        let mut random = CustomNumberGenerator::from_seed(8);
        let board = one_move_left();
        let mut cells = board.empty_cells();
        let result = rollout(board, &mut cells, &mut random);
        assert_eq!(
            result,
            Rollout {
                winner: Stone::Black,
                moves: 1
            }
        );
    }
}
