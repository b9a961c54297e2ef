//! Integration tests for mesh-effect-host.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use mesh_effect_host::suite::{
    MeshEffectSuiteV1, ParameterSuiteV1, MESH_EFFECT_SUITE, PARAMETER_SUITE, PROPERTY_SUITE,
};
use mesh_effect_host::{
    keys, Action, AttributeAttachment, Error, HostConfig, HostHandle, HostRuntime,
    LifecycleEvent, Mesh, MeshEffect, MeshEffectPlugin, MeshEffectRuntime, Opaque,
    PluginInfo, PluginStatus, PropertySet, RegistryConfig, Result, RuntimeConfig, Status,
    ATTRIB_FACE_COUNTS, ATTRIB_POINT_POSITION, ATTRIB_VERTEX_POINT, MAIN_INPUT, MAIN_OUTPUT,
};

// Plugin that answers every action from a script and records what it saw.
struct ScriptedPlugin {
    info: PluginInfo,
    fail: Option<(Action, Status)>,
    load_delay: Duration,
    calls: Mutex<Vec<Action>>,
    host: Mutex<Option<HostHandle>>,
}

impl ScriptedPlugin {
    fn new(identifier: &str) -> Self {
        Self {
            info: PluginInfo::new(identifier),
            fail: None,
            load_delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            host: Mutex::new(None),
        }
    }

    fn failing(mut self, action: Action, status: Status) -> Self {
        self.fail = Some((action, status));
        self
    }

    fn slow_load(mut self, delay: Duration) -> Self {
        self.load_delay = delay;
        self
    }

    fn calls(&self) -> Vec<Action> {
        self.calls.lock().clone()
    }

    fn count(&self, action: Action) -> usize {
        self.calls.lock().iter().filter(|a| **a == action).count()
    }
}

impl MeshEffectPlugin for ScriptedPlugin {
    fn info(&self) -> PluginInfo {
        self.info.clone()
    }

    fn set_host(&self, host: Option<HostHandle>) {
        *self.host.lock() = host;
    }

    fn main_entry(
        &self,
        action: Action,
        _effect: Option<&mut MeshEffect>,
        _in_args: Option<&PropertySet>,
        _out_args: Option<&mut PropertySet>,
    ) -> Status {
        if action == Action::Load {
            std::thread::sleep(self.load_delay);
        }
        self.calls.lock().push(action);
        match self.fail {
            Some((failing, status)) if failing == action => status,
            _ => Status::Ok,
        }
    }
}

// Plugin that mirrors its input mesh along one axis, going through the suites
// the way a binary plugin would.
#[derive(Default)]
struct MirrorPlugin {
    host: Mutex<Option<HostHandle>>,
}

impl MirrorPlugin {
    fn suites(&self) -> Result<(&'static MeshEffectSuiteV1, &'static ParameterSuiteV1)> {
        let host = self
            .host
            .lock()
            .clone()
            .ok_or_else(|| Error::bad_handle("no host"))?;
        let mesh_effect = host
            .fetch_suite(MESH_EFFECT_SUITE, 1)
            .and_then(|s| s.as_mesh_effect())
            .ok_or_else(|| Error::MissingHostFeature {
                suite: MESH_EFFECT_SUITE.to_string(),
                version: 1,
            })?;
        let parameter = host
            .fetch_suite(PARAMETER_SUITE, 1)
            .and_then(|s| s.as_parameter())
            .ok_or_else(|| Error::MissingHostFeature {
                suite: PARAMETER_SUITE.to_string(),
                version: 1,
            })?;
        Ok((mesh_effect, parameter))
    }

    fn describe(&self, effect: &mut MeshEffect) -> Result<()> {
        let (me, ps) = self.suites()?;

        (me.input_define)(effect, MAIN_INPUT)?;
        (me.input_define)(effect, MAIN_OUTPUT)?;

        let params = (me.get_param_set)(effect);
        let axis = (ps.param_define)(params, "OfxParamTypeInteger", "axis")?;
        axis.set_string(keys::LABEL, 0, "Axis")?;
        axis.set_int(keys::PARAM_DEFAULT, 0, 0)?;
        axis.set_int(keys::PARAM_MIN, 0, 0)?;
        axis.set_int(keys::PARAM_MAX, 0, 2)?;
        Ok(())
    }

    fn cook(&self, effect: &mut MeshEffect) -> Result<()> {
        let (me, ps) = self.suites()?;

        let params = (me.get_param_set)(effect);
        let axis = (ps.param_get_int)((ps.param_get_handle)(params, "axis")?, 0)? as usize;

        let input = (me.input_get_handle)(effect, MAIN_INPUT)?;
        let mesh = (me.input_get_mesh)(input)?;
        let counts = (mesh.point_count()?, mesh.vertex_count()?, mesh.face_count()?);
        let mut positions = read_f32(me, mesh, AttributeAttachment::Point, ATTRIB_POINT_POSITION)?;
        let corners = read_i32(me, mesh, AttributeAttachment::Vertex, ATTRIB_VERTEX_POINT)?;
        let sizes = read_i32(me, mesh, AttributeAttachment::Face, ATTRIB_FACE_COUNTS)?;
        (me.input_release_mesh)(input)?;

        for point in positions.chunks_mut(3) {
            point[axis] = -point[axis];
        }

        let output = (me.input_get_handle)(effect, MAIN_OUTPUT)?;
        let mesh = (me.input_get_mesh)(output)?;
        mesh.set_counts(counts.0 as i32, counts.1 as i32, counts.2 as i32)?;
        (me.mesh_alloc)(mesh)?;
        write_f32(me, mesh, AttributeAttachment::Point, ATTRIB_POINT_POSITION, &positions)?;
        write_i32(me, mesh, AttributeAttachment::Vertex, ATTRIB_VERTEX_POINT, &corners)?;
        write_i32(me, mesh, AttributeAttachment::Face, ATTRIB_FACE_COUNTS, &sizes)?;
        (me.input_release_mesh)(output)
    }
}

fn read_f32(
    me: &MeshEffectSuiteV1,
    mesh: &mut Mesh,
    attachment: AttributeAttachment,
    name: &str,
) -> Result<Vec<f32>> {
    (me.mesh_get_attribute)(mesh, attachment, name)?
        .as_f32()
        .map(<[f32]>::to_vec)
        .ok_or_else(|| Error::bad_handle(name))
}

fn read_i32(
    me: &MeshEffectSuiteV1,
    mesh: &mut Mesh,
    attachment: AttributeAttachment,
    name: &str,
) -> Result<Vec<i32>> {
    (me.mesh_get_attribute)(mesh, attachment, name)?
        .as_i32()
        .map(<[i32]>::to_vec)
        .ok_or_else(|| Error::bad_handle(name))
}

fn write_f32(
    me: &MeshEffectSuiteV1,
    mesh: &mut Mesh,
    attachment: AttributeAttachment,
    name: &str,
    values: &[f32],
) -> Result<()> {
    let data = (me.mesh_get_attribute)(mesh, attachment, name)?
        .as_f32_mut()
        .ok_or_else(|| Error::bad_handle(name))?;
    data.copy_from_slice(values);
    Ok(())
}

fn write_i32(
    me: &MeshEffectSuiteV1,
    mesh: &mut Mesh,
    attachment: AttributeAttachment,
    name: &str,
    values: &[i32],
) -> Result<()> {
    let data = (me.mesh_get_attribute)(mesh, attachment, name)?
        .as_i32_mut()
        .ok_or_else(|| Error::bad_handle(name))?;
    data.copy_from_slice(values);
    Ok(())
}

impl MeshEffectPlugin for MirrorPlugin {
    fn info(&self) -> PluginInfo {
        PluginInfo::new("net.example.mirror").with_version(1, 2)
    }

    fn set_host(&self, host: Option<HostHandle>) {
        *self.host.lock() = host;
    }

    fn main_entry(
        &self,
        action: Action,
        effect: Option<&mut MeshEffect>,
        _in_args: Option<&PropertySet>,
        _out_args: Option<&mut PropertySet>,
    ) -> Status {
        let result = match (action, effect) {
            (Action::Describe, Some(effect)) => self.describe(effect),
            (Action::Cook, Some(effect)) => self.cook(effect),
            (Action::Describe | Action::Cook, None) => Err(Error::bad_handle("no effect")),
            _ => Ok(()),
        };
        match result {
            Ok(()) => Status::Ok,
            Err(e) => e.status(),
        }
    }
}

// Native geometry the application attaches to input meshes.
struct Triangle {
    positions: [f32; 9],
}

fn fill_from_triangle(mesh: &mut Mesh) -> Result<()> {
    let internal = mesh.internal_data();
    let triangle = internal
        .downcast_ref::<Triangle>()
        .ok_or_else(|| Error::bad_handle("input has no native geometry"))?;

    mesh.set_counts(3, 3, 1)?;
    mesh.allocate()?;
    mesh.attribute_mut(AttributeAttachment::Point, ATTRIB_POINT_POSITION)?
        .as_f32_mut()
        .ok_or_else(|| Error::bad_handle("positions"))?
        .copy_from_slice(&triangle.positions);
    mesh.attribute_mut(AttributeAttachment::Vertex, ATTRIB_VERTEX_POINT)?
        .as_i32_mut()
        .ok_or_else(|| Error::bad_handle("corners"))?
        .copy_from_slice(&[0, 1, 2]);
    mesh.attribute_mut(AttributeAttachment::Face, ATTRIB_FACE_COUNTS)?
        .as_i32_mut()
        .ok_or_else(|| Error::bad_handle("faces"))?
        .copy_from_slice(&[3]);
    Ok(())
}

// Installs hooks that read triangles from input meshes and capture output positions.
fn install_adaptor(runtime: &MeshEffectRuntime) -> Arc<Mutex<Option<Vec<f32>>>> {
    let captured = Arc::new(Mutex::new(None));
    let sink = captured.clone();
    let host = runtime.host().unwrap();

    host.set_before_mesh_get(|_, mesh| {
        if !mesh.is_input() {
            return Status::Ok;
        }
        match fill_from_triangle(mesh) {
            Ok(()) => Status::Ok,
            Err(e) => e.status(),
        }
    })
    .unwrap();
    host.set_before_mesh_release(move |_, mesh| {
        if !mesh.is_input() {
            *sink.lock() = mesh
                .attribute(AttributeAttachment::Point, ATTRIB_POINT_POSITION)
                .ok()
                .and_then(|a| a.as_f32())
                .map(<[f32]>::to_vec);
        }
        Status::Ok
    })
    .unwrap();

    captured
}

fn record_events(runtime: &MeshEffectRuntime) -> Arc<Mutex<Vec<LifecycleEvent>>> {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = events.clone();
    runtime.on_event(move |event| sink.lock().push(event.clone()));
    events
}

fn count_events(events: &Mutex<Vec<LifecycleEvent>>, name: &str) -> usize {
    events.lock().iter().filter(|e| e.event_name() == name).count()
}

#[test]
fn test_mirror_plugin_end_to_end() {
    let runtime = MeshEffectRuntime::default_config().unwrap();
    let captured = install_adaptor(&runtime);
    let index = runtime.register(Arc::new(MirrorPlugin::default())).unwrap();

    runtime
        .use_plugin_with(index, |instance| {
            instance.parameters_mut().by_name_mut("axis")?.set_int(0, 1)?;
            instance
                .input_mut(MAIN_INPUT)?
                .mesh_mut()
                .set_internal_data(Opaque::new(Triangle {
                    positions: [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
                }))
        })
        .unwrap();

    let positions = captured.lock().clone().unwrap();
    assert_eq!(positions, vec![0.0, -0.0, 0.0, 1.0, -0.0, 0.0, 0.0, -1.0, 0.0]);
    assert_eq!(runtime.plugin_status(index), Some(PluginStatus::Ok));
}

#[test]
fn test_mirror_plugin_describes_parameters() {
    let runtime = MeshEffectRuntime::default_config().unwrap();
    install_adaptor(&runtime);
    let index = runtime.register(Arc::new(MirrorPlugin::default())).unwrap();

    let mut seen = None;
    runtime
        .use_plugin_with(index, |instance| {
            let axis = instance.parameters().by_name("axis")?;
            seen = Some((
                axis.properties().get_string(keys::LABEL, 0)?.to_string(),
                axis.properties().get_int(keys::PARAM_MAX, 0)?,
                instance.inputs().map(|i| i.name().to_string()).collect::<Vec<_>>(),
            ));
            instance
                .input_mut(MAIN_INPUT)?
                .mesh_mut()
                .set_internal_data(Opaque::new(Triangle { positions: [0.0; 9] }))
        })
        .unwrap();

    let (label, max, inputs) = seen.unwrap();
    assert_eq!(label, "Axis");
    assert_eq!(max, 2);
    assert_eq!(inputs, vec![MAIN_INPUT.to_string(), MAIN_OUTPUT.to_string()]);
}

#[test]
fn test_missing_native_geometry_fails_cook() {
    let runtime = MeshEffectRuntime::default_config().unwrap();
    install_adaptor(&runtime);
    let events = record_events(&runtime);
    let index = runtime.register(Arc::new(MirrorPlugin::default())).unwrap();

    let err = runtime.use_plugin(index).unwrap_err();
    assert!(matches!(
        err,
        Error::ActionFailed { action: Action::Cook, status: Status::ErrBadHandle, .. }
    ));
    assert_eq!(count_events(&events, "instance_released"), 1);
    assert_eq!(count_events(&events, "descriptor_released"), 1);
}

#[test]
fn test_describe_out_of_memory() {
    let runtime = MeshEffectRuntime::default_config().unwrap();
    let events = record_events(&runtime);
    let plugin = Arc::new(ScriptedPlugin::new("test.describe").failing(Action::Describe, Status::ErrMemory));
    let index = runtime.register(plugin.clone()).unwrap();

    let err = runtime.use_plugin(index).unwrap_err();

    assert_eq!(err.status(), Status::ErrMemory);
    assert_eq!(plugin.calls(), vec![Action::Load, Action::Describe]);
    assert_eq!(count_events(&events, "descriptor_released"), 1);
    assert_eq!(count_events(&events, "instance_released"), 0);
}

#[test]
fn test_cook_failure_tears_down() {
    let runtime = MeshEffectRuntime::default_config().unwrap();
    let events = record_events(&runtime);
    let plugin = Arc::new(ScriptedPlugin::new("test.cook").failing(Action::Cook, Status::Failed));
    let index = runtime.register(plugin.clone()).unwrap();

    let err = runtime.use_plugin(index).unwrap_err();

    assert!(err.is_plugin_failure());
    assert_eq!(
        plugin.calls(),
        vec![
            Action::Load,
            Action::Describe,
            Action::CreateInstance,
            Action::Cook,
            Action::DestroyInstance,
        ]
    );
    assert_eq!(count_events(&events, "instance_released"), 1);
    assert_eq!(count_events(&events, "descriptor_released"), 1);
}

#[test]
fn test_load_runs_once_and_failure_is_terminal() {
    let runtime = MeshEffectRuntime::default_config().unwrap();
    let ok = Arc::new(ScriptedPlugin::new("test.ok"));
    let broken = Arc::new(ScriptedPlugin::new("test.broken").failing(Action::Load, Status::Failed));
    let ok_index = runtime.register(ok.clone()).unwrap();
    let broken_index = runtime.register(broken.clone()).unwrap();

    runtime.use_plugin(ok_index).unwrap();
    runtime.use_plugin(ok_index).unwrap();
    assert_eq!(ok.count(Action::Load), 1);
    assert_eq!(ok.count(Action::Cook), 2);
    assert!(ok.host.lock().is_some());

    assert!(matches!(
        runtime.use_plugin(broken_index),
        Err(Error::ActionFailed { action: Action::Load, .. })
    ));
    assert!(matches!(
        runtime.use_plugin(broken_index),
        Err(Error::PluginUnavailable(_))
    ));
    assert_eq!(broken.calls(), vec![Action::Load]);
    assert_eq!(runtime.plugin_status(broken_index), Some(PluginStatus::Error));
    assert!(broken.host.lock().is_none());

    let stats = runtime.stats();
    assert_eq!(stats.loaded, 1);
    assert_eq!(stats.failed, 1);
}

#[test]
fn test_missing_host_feature_at_load_is_not_fatal() {
    let runtime = MeshEffectRuntime::default_config().unwrap();
    let plugin = Arc::new(
        ScriptedPlugin::new("test.feature").failing(Action::Load, Status::ErrMissingHostFeature),
    );
    let index = runtime.register(plugin.clone()).unwrap();

    runtime.use_plugin(index).unwrap();
    assert_eq!(runtime.plugin_status(index), Some(PluginStatus::Ok));
}

#[test]
fn test_host_reference_count_is_symmetric() {
    let runtime = MeshEffectRuntime::default_config().unwrap();
    let ok = runtime.register(Arc::new(ScriptedPlugin::new("test.ok"))).unwrap();
    let failing = runtime
        .register(Arc::new(ScriptedPlugin::new("test.fail").failing(Action::CreateInstance, Status::ErrFatal)))
        .unwrap();
    let before = runtime.host().unwrap();

    for _ in 0..3 {
        runtime.use_plugin(ok).unwrap();
        assert!(runtime.use_plugin(failing).is_err());
    }

    assert_eq!(runtime.host_runtime().use_count(), 1);
    assert!(Arc::ptr_eq(&before, &runtime.host().unwrap()));

    runtime.shutdown();
    assert_eq!(runtime.host_runtime().use_count(), 0);
    assert!(!runtime.host_runtime().is_alive());
}

#[test]
fn test_host_runtime_rebuilds_after_teardown() {
    let host_runtime = HostRuntime::new(HostConfig::new().with_name("test"));

    let first = host_runtime.acquire().unwrap();
    assert!(Arc::ptr_eq(&first, &host_runtime.acquire().unwrap()));
    host_runtime.release().unwrap();
    host_runtime.release().unwrap();
    assert!(host_runtime.current().is_none());

    let second = host_runtime.acquire().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(
        second.properties().read().get_string(keys::NAME, 0).unwrap(),
        "test"
    );
    host_runtime.release().unwrap();
    assert!(host_runtime.release().is_err());
}

#[test]
fn test_suite_fetch_identity() {
    let runtime = MeshEffectRuntime::default_config().unwrap();
    let host = runtime.host().unwrap();

    for name in [MESH_EFFECT_SUITE, PARAMETER_SUITE, PROPERTY_SUITE] {
        assert!(host.fetch_suite(name, 1).is_some());
        assert!(host.fetch_suite(name, 2).is_none());
    }

    let a = host.fetch_suite(MESH_EFFECT_SUITE, 1).and_then(|s| s.as_mesh_effect()).unwrap();
    let b = host.fetch_suite(MESH_EFFECT_SUITE, 1).and_then(|s| s.as_mesh_effect()).unwrap();
    assert!(std::ptr::eq(a, b));
}

#[test]
fn test_instance_shares_descriptor_effect_properties() {
    let runtime = MeshEffectRuntime::default_config().unwrap();
    install_adaptor(&runtime);
    let index = runtime.register(Arc::new(MirrorPlugin::default())).unwrap();

    runtime
        .use_plugin_with(index, |instance| {
            let shared = instance
                .parameters()
                .effect_properties()
                .cloned()
                .ok_or_else(|| Error::bad_handle("no effect properties"))?;
            assert!(!Arc::ptr_eq(&shared, instance.properties()));
            assert!(!instance.parameters().shares_effect_properties(instance.properties()));
            instance
                .input_mut(MAIN_INPUT)?
                .mesh_mut()
                .set_internal_data(Opaque::new(Triangle { positions: [0.0; 9] }))
        })
        .unwrap();
}

#[test]
fn test_unload_is_explicit() {
    let runtime = MeshEffectRuntime::default_config().unwrap();
    let plugin = Arc::new(ScriptedPlugin::new("test.unload"));
    let index = runtime.register(plugin.clone()).unwrap();

    runtime.use_plugin(index).unwrap();
    assert_eq!(plugin.count(Action::Unload), 0);

    runtime.unload_plugin(index).unwrap();
    assert_eq!(plugin.count(Action::Unload), 1);
    assert!(plugin.host.lock().is_none());
    assert!(matches!(runtime.use_plugin(index), Err(Error::PluginUnloaded(_))));
}

#[test]
fn test_registry_limits() {
    let runtime =
        MeshEffectRuntime::new(RuntimeConfig::new().with_registry(RegistryConfig::new().with_max_plugins(1)))
            .unwrap();

    runtime.register(Arc::new(ScriptedPlugin::new("a"))).unwrap();
    assert!(matches!(
        runtime.register(Arc::new(ScriptedPlugin::new("b"))),
        Err(Error::Registry(_))
    ));
    assert!(matches!(
        runtime.register(Arc::new(ScriptedPlugin::new("a"))),
        Err(Error::Registry(_)) | Err(Error::PluginAlreadyRegistered(_))
    ));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_uses_load_once() {
    let runtime = Arc::new(MeshEffectRuntime::default_config().unwrap());
    let plugin = Arc::new(ScriptedPlugin::new("test.concurrent").slow_load(Duration::from_millis(20)));
    let index = runtime.register(plugin.clone()).unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let runtime = runtime.clone();
            tokio::task::spawn_blocking(move || runtime.use_plugin(index))
        })
        .collect();

    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(plugin.count(Action::Load), 1);
    assert_eq!(plugin.count(Action::Cook), 8);
    assert_eq!(runtime.host_runtime().use_count(), 1);
}

#[cfg(feature = "serde")]
#[test]
fn test_config_from_file() {
    use std::io::Write;

    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(
        file,
        r#"
unload_on_shutdown = true

[host]
name = "test-host"
label = "Test Host"

[registry]
max_plugins = 2
"#
    )
    .unwrap();

    let config = RuntimeConfig::from_file(file.path()).unwrap();
    assert_eq!(config.host.name, "test-host");
    assert_eq!(config.registry.max_plugins, 2);
    assert!(config.unload_on_shutdown);

    let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(json, r#"{{"host": {{"label": "Json Host"}}}}"#).unwrap();
    let config = RuntimeConfig::from_file(json.path()).unwrap();
    assert_eq!(config.host.label, "Json Host");
    assert_eq!(config.host.name, HostConfig::default().name);

    let runtime = MeshEffectRuntime::new(config).unwrap();
    assert_eq!(
        runtime.host().unwrap().properties().read().get_string(keys::LABEL, 0).unwrap(),
        "Json Host"
    );

    assert!(matches!(
        RuntimeConfig::from_file("/nonexistent/mesh-effect-host.toml"),
        Err(Error::Io(_))
    ));
}

// Log sink shared between the subscriber and the test.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_teardown_failure_is_logged_not_returned() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    let plugin = Arc::new(
        ScriptedPlugin::new("test.logging").failing(Action::DestroyInstance, Status::Failed),
    );
    tracing::subscriber::with_default(subscriber, || {
        let runtime = MeshEffectRuntime::default_config().unwrap();
        let index = runtime.register(plugin.clone()).unwrap();
        runtime.use_plugin(index).unwrap();
    });
    assert_eq!(plugin.count(Action::DestroyInstance), 1);

    let output = String::from_utf8(logs.0.lock().clone()).unwrap();
    let line = output
        .lines()
        .find(|line| line.contains("OfxActionDestroyInstance"))
        .unwrap();
    assert!(line.contains("WARN"));
    assert!(line.contains("test.logging"));
    assert!(line.contains("kOfxStatFailed"));
    assert!(line.contains("ignored"));
    assert!(!output.contains("Use of plugin"));
}
