use std::collections::VecDeque;
use swayipc::{Node, NodeType};

use crate::command::FocusTarget;

/// A leaf window as it appeared in one tree snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowHandle {
    pub con_id: i64,
    pub window: Option<i64>, // X11 window id, None for native Wayland windows
    pub title: String,
    pub focused: bool,
    pub visible: Option<bool>, // as reported by the tree, when it reports it
}

impl WindowHandle {
    pub fn from_node(node: &Node) -> Option<Self> {
        // Only leaves: containers and splits always carry tiling children
        let is_leaf = matches!(node.node_type, NodeType::Con | NodeType::FloatingCon)
            && node.nodes.is_empty();
        if !is_leaf {
            return None;
        }

        Some(WindowHandle {
            con_id: node.id,
            window: node.window,
            title: node.name.clone().unwrap_or_default(),
            focused: node.focused,
            visible: node.visible,
        })
    }

    /// How this window is addressed in a focus command
    pub fn focus_target(&self) -> FocusTarget {
        match self.window {
            Some(id) => FocusTarget::X11Window(id),
            None => FocusTarget::Container(self.con_id),
        }
    }

    /// Identifier used in log messages
    pub fn display_id(&self) -> i64 {
        self.window.unwrap_or(self.con_id)
    }
}

/// One workspace and its leaf windows, in layout order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceView {
    pub name: String,
    pub leaves: Vec<WindowHandle>,
}

/// Everything navigation needs from one `get_tree` round-trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TreeSnapshot {
    pub workspaces: Vec<WorkspaceView>,
    pub focused_workspace: Option<String>,
}

impl TreeSnapshot {
    pub fn from_tree(root: &Node) -> Self {
        let mut workspace_nodes = Vec::new();
        collect_workspace_nodes(root, &mut workspace_nodes);

        let focused_workspace = workspace_nodes
            .iter()
            .find(|ws| contains_focus(ws))
            .and_then(|ws| ws.name.clone());

        let workspaces = workspace_nodes
            .into_iter()
            .map(|ws| WorkspaceView {
                name: ws.name.clone().unwrap_or_default(),
                leaves: collect_leaves(ws),
            })
            .collect();

        TreeSnapshot {
            workspaces,
            focused_workspace,
        }
    }

    /// Exact, case-sensitive lookup; the first workspace in tree order wins.
    pub fn workspace_by_name(&self, name: &str) -> Option<&WorkspaceView> {
        self.workspaces.iter().find(|ws| ws.name == name)
    }

    pub fn is_focused_workspace(&self, name: &str) -> bool {
        self.focused_workspace.as_deref() == Some(name)
    }
}

/// Collect workspace nodes in tree order (outputs first, then their content).
fn collect_workspace_nodes<'a>(node: &'a Node, out: &mut Vec<&'a Node>) {
    if node.node_type == NodeType::Workspace {
        out.push(node);
        return;
    }
    for child in &node.nodes {
        collect_workspace_nodes(child, out);
    }
}

/// Breadth-first walk over tiling then floating children, keeping leaves.
#[must_use]
fn collect_leaves(workspace: &Node) -> Vec<WindowHandle> {
    let mut leaves = Vec::new();
    let mut queue: VecDeque<&Node> = workspace
        .nodes
        .iter()
        .chain(&workspace.floating_nodes)
        .collect();

    while let Some(node) = queue.pop_front() {
        if let Some(handle) = WindowHandle::from_node(node) {
            leaves.push(handle);
        }
        queue.extend(node.nodes.iter().chain(&node.floating_nodes));
    }

    leaves
}

/// Whether the node itself or anything below it holds focus.
#[must_use]
fn contains_focus(node: &Node) -> bool {
    node.focused
        || node.nodes.iter().any(contains_focus)
        || node.floating_nodes.iter().any(contains_focus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    // ==================== tree fixtures ====================

    fn node(id: i64, node_type: &str, name: Option<&str>, nodes: Vec<Value>, floating: Vec<Value>) -> Value {
        let rect = json!({"x": 0, "y": 0, "width": 0, "height": 0});
        json!({
            "id": id,
            "name": name,
            "type": node_type,
            "border": "none",
            "current_border_width": 0,
            "layout": "splith",
            "percent": null,
            "rect": rect.clone(),
            "window_rect": rect.clone(),
            "deco_rect": rect.clone(),
            "geometry": rect,
            "urgent": false,
            "focused": false,
            "focus": [],
            "nodes": nodes,
            "floating_nodes": floating,
            "sticky": false,
        })
    }

    fn window(id: i64, xid: Option<i64>, title: &str) -> Value {
        let mut n = node(id, "con", Some(title), vec![], vec![]);
        n["window"] = json!(xid);
        n
    }

    fn focused(mut n: Value) -> Value {
        n["focused"] = json!(true);
        n
    }

    fn split(id: i64, children: Vec<Value>) -> Value {
        node(id, "con", None, children, vec![])
    }

    fn workspace(id: i64, name: &str, tiling: Vec<Value>, floating: Vec<Value>) -> Value {
        node(id, "workspace", Some(name), tiling, floating)
    }

    /// i3 puts workspaces inside a `content` container of each output
    fn i3_output(id: i64, name: &str, workspaces: Vec<Value>) -> Value {
        let dock = node(id + 1, "dockarea", Some("topdock"), vec![window(id + 2, Some(1), "bar")], vec![]);
        let content = node(id + 3, "con", Some("content"), workspaces, vec![]);
        node(id, "output", Some(name), vec![dock, content], vec![])
    }

    /// sway hangs workspaces directly off the output
    fn sway_output(id: i64, name: &str, workspaces: Vec<Value>) -> Value {
        node(id, "output", Some(name), workspaces, vec![])
    }

    fn root(outputs: Vec<Value>) -> Node {
        serde_json::from_value(node(1, "root", Some("root"), outputs, vec![])).unwrap()
    }

    fn names(snapshot: &TreeSnapshot) -> Vec<&str> {
        snapshot.workspaces.iter().map(|ws| ws.name.as_str()).collect()
    }

    fn titles(snapshot: &TreeSnapshot, workspace: &str) -> Vec<String> {
        snapshot
            .workspace_by_name(workspace)
            .unwrap()
            .leaves
            .iter()
            .map(|w| w.title.clone())
            .collect()
    }

    fn i3_tree() -> Node {
        let scratch = workspace(
            20,
            "__i3_scratch",
            vec![],
            vec![node(21, "floating_con", None, vec![window(22, Some(0x220), "S")], vec![])],
        );
        let ws1 = workspace(30, "1", vec![window(31, Some(0x310), "X")], vec![]);
        let ws4 = workspace(
            40,
            "4",
            vec![
                window(41, Some(0xa0), "A"),
                split(42, vec![focused(window(43, Some(0xb0), "B")), window(44, Some(0xc0), "C")]),
                window(45, Some(0xe0), "E"),
            ],
            vec![node(46, "floating_con", None, vec![window(47, Some(0xf0), "F")], vec![])],
        );

        root(vec![
            i3_output(10, "__i3", vec![scratch]),
            i3_output(100, "eDP-1", vec![ws1, ws4]),
        ])
    }

    // ==================== TreeSnapshot::from_tree ====================

    #[test]
    fn test_from_tree_lists_workspaces_in_tree_order() {
        let snapshot = TreeSnapshot::from_tree(&i3_tree());
        assert_eq!(names(&snapshot), vec!["__i3_scratch", "1", "4"]);
    }

    #[test]
    fn test_from_tree_finds_focused_workspace() {
        let snapshot = TreeSnapshot::from_tree(&i3_tree());
        assert_eq!(snapshot.focused_workspace.as_deref(), Some("4"));
    }

    #[test]
    fn test_from_tree_leaves_breadth_first_tiling_then_floating() {
        let snapshot = TreeSnapshot::from_tree(&i3_tree());

        // i3 wraps floating windows in a floating_con holding a con
        assert_eq!(titles(&snapshot, "4"), vec!["A", "E", "B", "C", "F"]);
        assert_eq!(titles(&snapshot, "1"), vec!["X"]);
    }

    #[test]
    fn test_from_tree_leaf_attributes() {
        let snapshot = TreeSnapshot::from_tree(&i3_tree());
        let leaves = &snapshot.workspace_by_name("4").unwrap().leaves;

        let b = &leaves[2];
        assert_eq!(b.con_id, 43);
        assert_eq!(b.window, Some(0xb0));
        assert!(b.focused);
        assert_eq!(leaves.iter().filter(|w| w.focused).count(), 1);
    }

    #[test]
    fn test_from_tree_keeps_scratch_windows_separate() {
        let snapshot = TreeSnapshot::from_tree(&i3_tree());

        assert_eq!(titles(&snapshot, "__i3_scratch"), vec!["S"]);
        assert!(!titles(&snapshot, "4").contains(&"S".to_string()));
    }

    #[test]
    fn test_from_tree_ignores_dock_clients() {
        let snapshot = TreeSnapshot::from_tree(&i3_tree());

        let all_titles: Vec<&str> = snapshot
            .workspaces
            .iter()
            .flat_map(|ws| ws.leaves.iter().map(|w| w.title.as_str()))
            .collect();
        assert!(!all_titles.contains(&"bar"));
    }

    #[test]
    fn test_from_tree_nested_splits_are_breadth_first() {
        let ws = workspace(
            10,
            "1",
            vec![
                split(11, vec![split(12, vec![window(13, None, "A"), window(14, None, "B")]), window(15, None, "C")]),
                focused(window(16, None, "D")),
            ],
            vec![],
        );
        let snapshot = TreeSnapshot::from_tree(&root(vec![sway_output(2, "DP-1", vec![ws])]));

        assert_eq!(titles(&snapshot, "1"), vec!["D", "C", "A", "B"]);
    }

    #[test]
    fn test_from_tree_sway_floating_window() {
        let mut floating = node(32, "floating_con", Some("G"), vec![], vec![]);
        floating["visible"] = json!(false);
        let ws = workspace(30, "3", vec![window(31, Some(0x310), "A")], vec![focused(floating)]);
        let scratch = workspace(20, "__i3_scratch", vec![], vec![]);

        let snapshot = TreeSnapshot::from_tree(&root(vec![
            sway_output(10, "__i3", vec![scratch]),
            sway_output(11, "DP-1", vec![ws]),
        ]));

        assert_eq!(names(&snapshot), vec!["__i3_scratch", "3"]);
        assert_eq!(snapshot.focused_workspace.as_deref(), Some("3"));
        assert_eq!(titles(&snapshot, "3"), vec!["A", "G"]);

        let g = &snapshot.workspace_by_name("3").unwrap().leaves[1];
        assert_eq!(g.window, None);
        assert_eq!(g.visible, Some(false));
        assert!(g.focused);
        assert_eq!(g.focus_target(), FocusTarget::Container(32));
    }

    #[test]
    fn test_from_tree_focused_empty_workspace() {
        let ws1 = workspace(30, "1", vec![window(31, Some(0x310), "X")], vec![]);
        let ws2 = focused(workspace(40, "2", vec![], vec![]));

        let snapshot = TreeSnapshot::from_tree(&root(vec![sway_output(10, "DP-1", vec![ws1, ws2])]));

        assert_eq!(snapshot.focused_workspace.as_deref(), Some("2"));
        assert!(snapshot.workspace_by_name("2").unwrap().leaves.is_empty());
        assert!(!snapshot.workspace_by_name("1").unwrap().leaves[0].focused);
    }

    #[test]
    fn test_from_tree_without_focus() {
        let ws = workspace(30, "1", vec![window(31, Some(0x310), "X")], vec![]);
        let snapshot = TreeSnapshot::from_tree(&root(vec![sway_output(10, "DP-1", vec![ws])]));

        assert_eq!(snapshot.focused_workspace, None);
        assert!(!snapshot.is_focused_workspace("1"));
    }

    // ==================== snapshot lookups ====================

    fn make_window(con_id: i64, window: Option<i64>, focused: bool) -> WindowHandle {
        WindowHandle {
            con_id,
            window,
            title: format!("win-{}", con_id),
            focused,
            visible: None,
        }
    }

    fn make_snapshot() -> TreeSnapshot {
        TreeSnapshot {
            workspaces: vec![
                WorkspaceView {
                    name: "1".to_string(),
                    leaves: vec![make_window(1, Some(100), true)],
                },
                WorkspaceView {
                    name: "mail".to_string(),
                    leaves: vec![make_window(2, Some(200), false)],
                },
                WorkspaceView {
                    name: "mail".to_string(),
                    leaves: vec![],
                },
            ],
            focused_workspace: Some("1".to_string()),
        }
    }

    #[test]
    fn test_workspace_by_name_exact_match() {
        let snapshot = make_snapshot();
        let ws = snapshot.workspace_by_name("1").unwrap();
        assert_eq!(ws.name, "1");
        assert_eq!(ws.leaves.len(), 1);
    }

    #[test]
    fn test_workspace_by_name_is_case_sensitive() {
        let snapshot = make_snapshot();
        assert!(snapshot.workspace_by_name("Mail").is_none());
        assert!(snapshot.workspace_by_name("mail ").is_none());
    }

    #[test]
    fn test_workspace_by_name_first_match_wins() {
        let snapshot = make_snapshot();
        let ws = snapshot.workspace_by_name("mail").unwrap();
        assert_eq!(ws.leaves.len(), 1);
        assert_eq!(ws.leaves[0].con_id, 2);
    }

    #[test]
    fn test_workspace_by_name_missing() {
        let snapshot = make_snapshot();
        assert!(snapshot.workspace_by_name("4").is_none());
        assert!(TreeSnapshot::default().workspace_by_name("1").is_none());
    }

    #[test]
    fn test_is_focused_workspace() {
        let snapshot = make_snapshot();
        assert!(snapshot.is_focused_workspace("1"));
        assert!(!snapshot.is_focused_workspace("mail"));
        assert!(!TreeSnapshot::default().is_focused_workspace("1"));
    }

    #[test]
    fn test_focus_target_prefers_x11_window() {
        let x11 = make_window(5, Some(0x2a00007), false);
        assert_eq!(x11.focus_target(), FocusTarget::X11Window(0x2a00007));
        assert_eq!(x11.display_id(), 0x2a00007);

        let wayland = make_window(5, None, false);
        assert_eq!(wayland.focus_target(), FocusTarget::Container(5));
        assert_eq!(wayland.display_id(), 5);
    }
}
