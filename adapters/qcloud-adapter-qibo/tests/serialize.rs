use qcloud_adapter_qibo::to_raw;
use qcloud_ir::{Circuit, QubitId};

#[test]
fn queue_order_and_registers_survive() {
    let mut circuit = Circuit::new(3);
    circuit
        .h(QubitId(0))
        .unwrap()
        .crx(0.25, QubitId(0), QubitId(2))
        .unwrap()
        .fswap(QubitId(1), QubitId(2))
        .unwrap();
    circuit.measure_into("a", [QubitId(2)]).unwrap();
    circuit.measure_into("b", [QubitId(0), QubitId(1)]).unwrap();

    let raw = to_raw(&circuit);
    let names: Vec<&str> = raw.queue.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, ["h", "crx", "fswap", "measure", "measure"]);
    assert_eq!(raw.queue[1].init_args, [0, 2]);
    assert_eq!(raw.queue[1].init_kwargs["theta"], 0.25);
    assert_eq!(raw.queue[3].init_kwargs["register_name"], "a");
    assert_eq!(raw.queue[4].init_args, [0, 1]);
    assert_eq!(raw.nqubits, 3);
}
