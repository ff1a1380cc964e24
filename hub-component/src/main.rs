fn main() {
    hub_component::server::run();
}
