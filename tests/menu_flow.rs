//! End-to-end menu flows against the mock host.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::FutureExt;
use futures::channel::oneshot;
use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;

use flyout::popup::testing::{FixedTextMeasurer, MockHost};
use flyout::popup::{
    Anchor, PopupError, PopupSession, RowEstimator, SessionContent, SessionState, SurfaceHandle,
    TriggerEvent, TriggerKind, activate_item,
};
use flyout::{Link, MenuItem, Outcome, Point, PopupConfig, Rectangle, Size};

#[derive(Default)]
struct Workspace {
    activations: Cell<usize>,
    resolver_runs: Cell<usize>,
}

fn context_menu_event() -> TriggerEvent {
    TriggerEvent::new(
        TriggerKind::ContextMenu,
        Anchor::Pointer(Point::new(100.0, 100.0)),
    )
}

fn row(y: f32) -> Rectangle {
    Rectangle {
        x: 100.0,
        y,
        width: 180.0,
        height: 24.0,
    }
}

fn open_menu(
    host: &Rc<MockHost>,
    items: Vec<MenuItem<Workspace>>,
) -> Rc<PopupSession<Workspace, MockHost>> {
    let session = Rc::new(PopupSession::new(
        Rc::clone(host),
        Rc::new(RowEstimator::new(FixedTextMeasurer::new(8.0))),
        PopupConfig::default(),
        Rc::new(Workspace::default()),
        SessionContent::Menu(Rc::new(items)),
    ));

    block_on(session.open_at(&context_menu_event())).unwrap();
    assert_eq!(session.state(), SessionState::Open);
    session
}

#[test]
fn leaf_selection_runs_the_action_and_closes() {
    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    let session = open_menu(
        &host,
        vec![MenuItem::action("Rename").on_activate(|workspace: &Workspace| {
            workspace.activations.set(workspace.activations.get() + 1);
        })],
    );

    block_on(activate_item(&session, 0, row(100.0))).unwrap();

    assert_eq!(session.context().activations.get(), 1);
    assert_eq!(session.state(), SessionState::Closed);
    assert!(host.last_surface().unwrap().is_closed());
}

#[test]
fn separators_and_disabled_rows_do_not_activate() {
    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    let session = open_menu(
        &host,
        vec![
            MenuItem::separator(),
            MenuItem::action("Delete")
                .on_activate(|workspace: &Workspace| {
                    workspace.activations.set(workspace.activations.get() + 1);
                })
                .disabled_when(|_| true),
        ],
    );

    block_on(activate_item(&session, 0, row(100.0))).unwrap();
    block_on(activate_item(&session, 1, row(124.0))).unwrap();

    assert_eq!(session.context().activations.get(), 0);
    assert_eq!(session.state(), SessionState::Open);
    assert_eq!(host.surfaces().len(), 1);
}

#[test]
fn opening_twice_is_rejected_and_harmless() {
    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    let session = open_menu(&host, vec![MenuItem::action("Copy")]);

    let result = block_on(session.open_at(&context_menu_event()));

    assert!(matches!(result, Err(PopupError::AlreadyActive)));
    assert_eq!(session.state(), SessionState::Open);
    assert_eq!(host.surfaces().len(), 1);
}

#[test]
fn failed_host_open_leaves_a_closable_session() {
    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    host.fail_next_open();

    let session = Rc::new(PopupSession::new(
        Rc::clone(&host),
        Rc::new(RowEstimator::new(FixedTextMeasurer::new(8.0))),
        PopupConfig::default(),
        Rc::new(Workspace::default()),
        SessionContent::Menu(Rc::new(vec![MenuItem::action("Copy")])),
    ));

    let result = block_on(session.open_at(&context_menu_event()));

    assert!(matches!(result, Err(PopupError::Host(_))));
    assert_eq!(session.state(), SessionState::Positioned);
    assert!(host.surfaces().is_empty());

    // The stranded session can still be torn down.
    session.close(Outcome::Dismissed);
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(block_on(session.closed()), Outcome::Dismissed);
}

#[test]
fn activation_requires_an_open_session() {
    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    let session = Rc::new(PopupSession::new(
        Rc::clone(&host),
        Rc::new(RowEstimator::new(FixedTextMeasurer::new(8.0))),
        PopupConfig::default(),
        Rc::new(Workspace::default()),
        SessionContent::Menu(Rc::new(vec![MenuItem::action("Copy")])),
    ));

    let result = block_on(activate_item(&session, 0, row(100.0)));

    assert!(matches!(result, Err(PopupError::ParentNotOpen)));
}

#[test]
fn child_selection_cascades_to_the_root() {
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();

    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    let session = open_menu(
        &host,
        vec![
            MenuItem::submenu("Share", vec![MenuItem::action("Email")]).on_activate(
                |workspace: &Workspace| {
                    workspace.activations.set(workspace.activations.get() + 1);
                },
            ),
        ],
    );

    let (activation, activated) = {
        let session = Rc::clone(&session);
        async move { activate_item(&session, 0, row(100.0)).await }.remote_handle()
    };
    spawner.spawn_local(activation).unwrap();
    pool.run_until_stalled();

    // The child panel is open beside the row while the parent stays up.
    assert_eq!(host.surfaces().len(), 2);
    assert_eq!(session.state(), SessionState::Open);
    let child = host.last_surface().unwrap();
    assert_eq!(child.position.left, Some(280.0));
    assert_eq!(child.position.top, Some(100.0));

    child.close(Outcome::Selected);
    pool.run_until_stalled();

    block_on(activated).unwrap();
    assert_eq!(session.context().activations.get(), 1);
    assert_eq!(session.state(), SessionState::Closed);
    assert!(host.surfaces().iter().all(|surface| surface.is_closed()));
}

#[test]
fn child_dismissal_keeps_the_parent_open() {
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();

    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    let session = open_menu(
        &host,
        vec![MenuItem::submenu("Share", vec![MenuItem::action("Email")])],
    );

    let (activation, activated) = {
        let session = Rc::clone(&session);
        async move { activate_item(&session, 0, row(100.0)).await }.remote_handle()
    };
    spawner.spawn_local(activation).unwrap();
    pool.run_until_stalled();

    host.last_surface().unwrap().close(Outcome::Dismissed);
    pool.run_until_stalled();

    block_on(activated).unwrap();
    assert_eq!(session.state(), SessionState::Open);
    assert!(!host.surfaces()[0].is_closed());
}

#[test]
fn closing_a_parent_tears_children_down_first() {
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();

    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    let session = open_menu(
        &host,
        vec![MenuItem::submenu("Share", vec![MenuItem::action("Email")])],
    );

    let (activation, activated) = {
        let session = Rc::clone(&session);
        async move { activate_item(&session, 0, row(100.0)).await }.remote_handle()
    };
    spawner.spawn_local(activation).unwrap();
    pool.run_until_stalled();
    assert_eq!(host.surfaces().len(), 2);
    let parent_id = host.surfaces()[0].session;
    let child_id = host.surfaces()[1].session;

    session.close(Outcome::Dismissed);
    pool.run_until_stalled();

    block_on(activated).unwrap();
    assert!(host.surfaces().iter().all(|surface| surface.is_closed()));
    assert_eq!(host.close_order(), vec![child_id, parent_id]);
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn static_children_resolve_without_mutating_the_source() {
    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    let session = open_menu(
        &host,
        vec![MenuItem::submenu(
            "Share",
            vec![MenuItem::action("Email"), MenuItem::action("Copy link")],
        )],
    );

    let first = block_on(session.resolve_children(0)).unwrap();
    let second = block_on(session.resolve_children(0)).unwrap();

    let labels = |children: &[MenuItem<Workspace>]| {
        children
            .iter()
            .map(|child| child.label.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(labels(&first), labels(&second));
    assert_eq!(
        labels(&first),
        vec![Some(String::from("Email")), Some(String::from("Copy link"))]
    );
}

fn resolver_menu(cache: bool) -> Vec<MenuItem<Workspace>> {
    vec![
        MenuItem::resolved_submenu("Recent", |workspace: &Workspace| {
            workspace
                .resolver_runs
                .set(workspace.resolver_runs.get() + 1);
            Box::pin(async { Ok(vec![MenuItem::action("a.txt")]) })
        })
        .cache_resolved(cache),
    ]
}

fn open_submenu_and_dismiss(
    pool: &mut LocalPool,
    host: &Rc<MockHost>,
    session: &Rc<PopupSession<Workspace, MockHost>>,
) {
    let spawner = pool.spawner();
    let (activation, activated) = {
        let session = Rc::clone(session);
        async move { activate_item(&session, 0, row(100.0)).await }.remote_handle()
    };
    spawner.spawn_local(activation).unwrap();
    pool.run_until_stalled();

    host.last_surface().unwrap().close(Outcome::Dismissed);
    pool.run_until_stalled();
    block_on(activated).unwrap();
}

#[test]
fn resolver_runs_on_every_open_by_default() {
    let mut pool = LocalPool::new();
    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    let session = open_menu(&host, resolver_menu(false));

    open_submenu_and_dismiss(&mut pool, &host, &session);
    open_submenu_and_dismiss(&mut pool, &host, &session);

    assert_eq!(session.context().resolver_runs.get(), 2);
}

#[test]
fn cached_resolver_runs_once() {
    let mut pool = LocalPool::new();
    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    let session = open_menu(&host, resolver_menu(true));

    open_submenu_and_dismiss(&mut pool, &host, &session);
    open_submenu_and_dismiss(&mut pool, &host, &session);

    assert_eq!(session.context().resolver_runs.get(), 1);
    assert_eq!(host.surfaces().len(), 3);
}

#[derive(Default)]
struct Gated {
    gates: RefCell<Vec<Option<oneshot::Receiver<()>>>>,
    runs: RefCell<Vec<usize>>,
}

fn gated_row(label: &str, index: usize) -> MenuItem<Gated> {
    MenuItem::resolved_submenu(label, move |gated: &Gated| {
        gated.runs.borrow_mut()[index] += 1;
        let gate = gated.gates.borrow_mut()[index].take();
        Box::pin(async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok(vec![MenuItem::action("entry")])
        })
    })
}

#[test]
fn concurrent_resolvers_track_their_own_rows() {
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();

    let (first_tx, first_rx) = oneshot::channel();
    let (second_tx, second_rx) = oneshot::channel();
    let context = Rc::new(Gated {
        gates: RefCell::new(vec![Some(first_rx), Some(second_rx)]),
        runs: RefCell::new(vec![0, 0]),
    });

    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    let session = Rc::new(PopupSession::new(
        Rc::clone(&host),
        Rc::new(RowEstimator::new(FixedTextMeasurer::new(8.0))),
        PopupConfig::default(),
        context,
        SessionContent::Menu(Rc::new(vec![
            gated_row("Recent files", 0),
            gated_row("Recent projects", 1),
        ])),
    ));
    block_on(session.open_at(&context_menu_event())).unwrap();

    let spawn_activation = |index: usize, y: f32| {
        let session = Rc::clone(&session);
        let (activation, activated) =
            async move { activate_item(&session, index, row(y)).await }.remote_handle();
        spawner.spawn_local(activation).unwrap();
        activated
    };
    let first = spawn_activation(0, 100.0);
    let second = spawn_activation(1, 124.0);
    pool.run_until_stalled();

    assert!(session.is_resolving(0));
    assert!(session.is_resolving(1));

    first_tx.send(()).unwrap();
    pool.run_until_stalled();

    // The first row's marker clears without touching the second's.
    assert!(!session.is_resolving(0));
    assert!(session.is_resolving(1));

    // Re-activating the busy row is refused, not resolved twice.
    let retry = block_on(activate_item(&session, 1, row(124.0)));
    assert!(matches!(retry, Err(PopupError::AlreadyActive)));
    assert_eq!(*session.context().runs.borrow(), vec![1, 1]);

    second_tx.send(()).unwrap();
    pool.run_until_stalled();
    assert!(!session.is_resolving(1));

    for surface in host.surfaces().iter().skip(1) {
        surface.close(Outcome::Dismissed);
    }
    pool.run_until_stalled();
    block_on(first).unwrap();
    block_on(second).unwrap();
}

#[test]
fn failed_resolution_leaves_the_menu_open() {
    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    let session = open_menu(
        &host,
        vec![MenuItem::resolved_submenu("Recent", |_: &Workspace| {
            Box::pin(async { Err(flyout::core::menu::ResolveError::new("backend gone")) })
        })],
    );

    let result = block_on(activate_item(&session, 0, row(100.0)));

    assert!(matches!(result, Err(PopupError::Resolve(_))));
    assert_eq!(session.state(), SessionState::Open);
    assert_eq!(host.surfaces().len(), 1);
}

#[test]
fn template_children_open_with_their_declared_size() {
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();

    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    let session = open_menu(
        &host,
        vec![
            MenuItem::template_submenu("Preview", flyout::Template::new("preview-view"))
                .child_size(300.0, 200.0),
        ],
    );

    let (activation, activated) = {
        let session = Rc::clone(&session);
        async move { activate_item(&session, 0, row(100.0)).await }.remote_handle()
    };
    spawner.spawn_local(activation).unwrap();
    pool.run_until_stalled();

    let child = host.last_surface().unwrap();
    assert!(child.rows.is_empty());
    assert_eq!(child.position.top, Some(100.0));
    assert_eq!(child.position.left, Some(280.0));

    child.close(Outcome::Dismissed);
    pool.run_until_stalled();
    block_on(activated).unwrap();
}

#[test]
fn tooltips_open_at_the_pointer_and_close_on_request() {
    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));

    let tooltip = block_on(flyout::open_tooltip(
        Rc::clone(&host),
        Rc::new(RowEstimator::new(FixedTextMeasurer::new(8.0))),
        PopupConfig::default(),
        flyout::TemplateSubmenu {
            template: flyout::Template::new("tip"),
            width: None,
            height: None,
        },
        Rc::new(Workspace::default()),
        &context_menu_event(),
    ))
    .unwrap();

    // Unmeasurable template content anchors straight at the pointer.
    let surface = host.last_surface().unwrap();
    assert_eq!(surface.position.top, Some(100.0));
    assert_eq!(surface.position.left, Some(100.0));
    assert_eq!(tooltip.state(), SessionState::Open);

    tooltip.close(Outcome::Dismissed);
    assert_eq!(tooltip.state(), SessionState::Closed);
    assert!(surface.is_closed());
}

#[test]
fn link_rows_follow_their_link_on_selection() {
    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    let session = open_menu(
        &host,
        vec![MenuItem::action("Project page").link(Link::new("https://example.com/project"))],
    );

    block_on(activate_item(&session, 0, row(100.0))).unwrap();

    let followed = host.followed_links();
    assert_eq!(followed.len(), 1);
    assert_eq!(followed[0].url, "https://example.com/project");
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn reflow_pulls_an_overflowing_panel_back_and_settles() {
    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    let session = open_menu(&host, vec![MenuItem::action("Copy")]);

    let surface = host.last_surface().unwrap();
    surface.set_bounds(Rectangle {
        x: 600.0,
        y: 550.0,
        width: 150.0,
        height: 100.0,
    });

    session.reflow();

    let moved = surface.bounds().unwrap();
    assert_eq!(moved.y, 488.0);
    assert_eq!(moved.x, 600.0);

    // Already inside the viewport now; a second pass changes nothing.
    session.reflow();
    assert_eq!(surface.bounds().unwrap(), moved);
}

#[test]
fn panels_carry_configured_and_session_classes() {
    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));
    let session = Rc::new(PopupSession::new(
        Rc::clone(&host),
        Rc::new(RowEstimator::new(FixedTextMeasurer::new(8.0))),
        PopupConfig::default().class("workspace-menu"),
        Rc::new(Workspace::default()),
        SessionContent::Menu(Rc::new(vec![MenuItem::action("Copy")])),
    ));
    block_on(session.open_at(&context_menu_event())).unwrap();

    let surface = host.last_surface().unwrap();
    assert!(surface.has_backdrop);
    assert!(surface.classes.contains(&String::from("workspace-menu")));
    assert!(surface.classes.contains(&session.id().panel_class()));
}

#[test]
fn open_context_menu_resolves_with_the_outcome() {
    let mut pool = LocalPool::new();
    let spawner = pool.spawner();
    let host = Rc::new(MockHost::new(Size::new(800.0, 600.0)));

    let (menu, finished) = {
        let host = Rc::clone(&host);
        async move {
            flyout::open_context_menu(
                host,
                Rc::new(RowEstimator::new(FixedTextMeasurer::new(8.0))),
                PopupConfig::default(),
                vec![MenuItem::action("Copy"), MenuItem::action("Paste")],
                Rc::new(Workspace::default()),
                &context_menu_event(),
            )
            .await
        }
        .remote_handle()
    };
    spawner.spawn_local(menu).unwrap();
    pool.run_until_stalled();

    let surface = host.last_surface().unwrap();
    assert!(!surface.is_closed());
    surface.close(Outcome::Selected);
    pool.run_until_stalled();

    assert_eq!(block_on(finished).unwrap(), Outcome::Selected);
}
